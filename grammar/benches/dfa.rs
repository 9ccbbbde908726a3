use criterion::{criterion_group, criterion_main, Criterion};
use grammar::charset::CharSet;
use grammar::graph::Graph;
use grammar::lexer::{Automaton, Dfa};
use grammar::symbol::SymbolKind;
use grammar::tab::Tab;

const KEYWORDS: &[&str] = &[
  "abstract", "break", "case", "catch", "class", "const", "continue",
  "default", "do", "else", "enum", "extends", "final", "finally", "for",
  "goto", "if", "implements", "import", "instanceof", "interface", "native",
  "new", "package", "private", "protected", "public", "return", "static",
  "super", "switch", "synchronized", "this", "throw", "throws", "transient",
  "try", "void", "volatile", "while",
];

fn class(tab: &mut Tab, name: &str, set: CharSet) -> Graph {
  let class = match tab.find_char_class(name) {
    Some(class) => class,
    None => tab.new_char_class(name, set),
  };
  Graph::new(tab.new_class(class, 1))
}

fn build() -> (Tab, Automaton) {
  let mut tab = Tab::new();
  let mut dfa = Dfa::new();
  let mut letter = CharSet::from_range('a' as u32, 'z' as u32);
  letter.set_range('A' as u32, 'Z' as u32);
  letter.set('_' as u32);
  let digit = CharSet::from_range('0' as u32, '9' as u32);

  let ident = tab.new_sym(SymbolKind::Terminal, "ident", 1);
  let first = class(&mut tab, "letter", letter.clone());
  let l = class(&mut tab, "letter", letter);
  let d = class(&mut tab, "digit", digit);
  let alt = tab.make_first_alt(l);
  let alt = tab.make_alternative(alt, d);
  let iter = tab.make_iteration(alt);
  let g = tab.make_sequence(first, iter);
  tab.finish(&g);
  dfa.convert_to_states(&mut tab, g.l, ident);

  for kw in KEYWORDS {
    let quoted = format!("\"{}\"", kw);
    let sym = tab.new_sym(SymbolKind::Terminal, &quoted, 2);
    dfa.match_literal(&mut tab, &quoted, sym);
  }
  for op in &["\"==\"", "\"=\"", "\"!=\"", "\"<=\"", "\"<\"", "\"+\"", "\"++\""] {
    let sym = tab.new_sym(SymbolKind::Terminal, op, 3);
    let g = tab.str_to_graph(op, 3);
    tab.finish(&g);
    dfa.convert_to_states(&mut tab, g.l, sym);
  }

  let automaton = dfa.make_deterministic(&mut tab);
  (tab, automaton)
}

fn dfa_benchmark(c: &mut Criterion) {
  c.bench_function("build", |b| b.iter(|| build()));

  let (_tab, automaton) = build();
  let input = "if (a <= b) return this; else while (i != n) i++; ".repeat(200);
  c.bench_function("scan", |b| b.iter(|| automaton.lex(&input).count()));
}

criterion_group!{
  name = benches;
  config = Criterion::default().significance_level(0.1).sample_size(10);
  targets = dfa_benchmark
}
criterion_main!(benches);
