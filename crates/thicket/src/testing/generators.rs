//! # Grammar-Based Input Generators
//!
//! This module generates random input strings from a grammar by
//! expanding its expression trees, for property-based testing with
//! `proptest` and for seeding fuzz corpora.
//!
//! Generation is structural: predicates contribute nothing and ordered
//! choice is sampled uniformly, so a grammar whose acceptance depends
//! on lookahead or on choice ordering can occasionally yield a string
//! its own parser rejects. Properties that need accepted input should
//! parse the candidate and discard rejects.

use crate::expr::ParsingExpression;
use crate::grammar::Grammar;

/// Configuration for grammar-based input generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Maximum depth of recursive rule expansion
    pub max_depth: usize,
    /// Maximum number of repetitions for `*` and `+` expressions
    pub max_repetitions: usize,
    /// Probability of taking optional expressions (0.0 to 1.0)
    pub optional_probability: f64,
    /// Seed for reproducible generation
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_repetitions: 5,
            optional_probability: 0.5,
            seed: None,
        }
    }
}

/// Generator for input strings a grammar is likely to accept
pub struct InputGenerator<'g> {
    grammar: &'g Grammar,
    config: GeneratorConfig,
}

impl<'g> InputGenerator<'g> {
    /// Create a new input generator
    #[must_use]
    pub const fn new(grammar: &'g Grammar, config: GeneratorConfig) -> Self {
        Self { grammar, config }
    }

    /// Generate a random input for the grammar's root rule
    ///
    /// A fixed seed reproduces the same input on every call.
    #[must_use]
    pub fn generate(&self) -> String {
        self.grammar.root().map_or_else(String::new, |root| {
            self.generate_from(root)
        })
    }

    /// Generate a random input for the named rule
    #[must_use]
    pub fn generate_from(&self, rule: &str) -> String {
        let mut result = String::new();
        let mut rng = if let Some(seed) = self.config.seed {
            SimpleRng::with_seed(seed)
        } else {
            SimpleRng::new()
        };

        if let Ok(expression) = self.grammar.resolve(rule) {
            self.generate_expr(expression, 0, &mut result, &mut rng);
        }

        result
    }

    fn generate_expr(
        &self,
        expression: &ParsingExpression,
        depth: usize,
        result: &mut String,
        rng: &mut SimpleRng,
    ) {
        if depth > self.config.max_depth {
            return;
        }

        match expression {
            ParsingExpression::Terminal(prefix) => {
                result.push_str(prefix);
            }
            ParsingExpression::Anything => {
                result.push(random_printable(rng));
            }
            ParsingExpression::Class(class) => {
                if class.is_negated() {
                    // scan the printable range from a random start for an
                    // accepted character
                    let start = rng.next_u64() % 95;
                    for offset in 0..95 {
                        if let Some(ch) = char::from_u32(0x20 + ((start + offset) % 95) as u32)
                            && class.matches(ch)
                        {
                            result.push(ch);
                            break;
                        }
                    }
                } else if let Some(&(lo, hi)) = pick(class.ranges(), rng) {
                    let span = hi as u32 - lo as u32 + 1;
                    let offset = (rng.next_u64() % u64::from(span)) as u32;
                    result.push(char::from_u32(lo as u32 + offset).unwrap_or(lo));
                }
            }
            ParsingExpression::Nonterminal(name) => {
                if let Ok(inner) = self.grammar.resolve(name) {
                    self.generate_expr(inner, depth + 1, result, rng);
                }
            }
            ParsingExpression::Sequence(elements) => {
                for element in elements {
                    self.generate_expr(&element.expr, depth, result, rng);
                }
            }
            ParsingExpression::Choice(alternatives) => {
                if let Some(alternative) = pick(alternatives, rng) {
                    self.generate_expr(alternative, depth, result, rng);
                }
            }
            ParsingExpression::Optional(inner) => {
                if rng.next_f64() < self.config.optional_probability {
                    self.generate_expr(inner, depth, result, rng);
                }
            }
            ParsingExpression::ZeroOrMore(inner) => {
                let reps = rng.next_u64() as usize % (self.config.max_repetitions + 1);
                for _ in 0..reps {
                    self.generate_expr(inner, depth, result, rng);
                }
            }
            ParsingExpression::OneOrMore(inner) => {
                let reps = 1 + rng.next_u64() as usize % self.config.max_repetitions;
                for _ in 0..reps {
                    self.generate_expr(inner, depth, result, rng);
                }
            }
            // zero-width
            ParsingExpression::AndPredicate(_) | ParsingExpression::NotPredicate(_) => {}
        }
    }
}

/// Fuzzer that mutates generated inputs into near-miss edge cases
pub struct InputFuzzer<'g> {
    generator: InputGenerator<'g>,
}

impl<'g> InputFuzzer<'g> {
    /// Create a new input fuzzer
    #[must_use]
    pub const fn new(grammar: &'g Grammar, config: GeneratorConfig) -> Self {
        Self {
            generator: InputGenerator::new(grammar, config),
        }
    }

    /// Generate a mutated (possibly rejected) input for the root rule
    #[must_use]
    pub fn generate_mutated(&self, num_mutations: usize) -> String {
        let mut chars: Vec<char> = self.generator.generate().chars().collect();
        let mut rng = if let Some(seed) = self.generator.config.seed {
            SimpleRng::with_seed(seed.wrapping_add(1))
        } else {
            SimpleRng::new()
        };

        for _ in 0..num_mutations {
            if chars.is_empty() {
                chars.push(random_printable(&mut rng));
                continue;
            }
            let idx = rng.next_u64() as usize % chars.len();
            match rng.next_u64() % 5 {
                0 => {
                    chars.remove(idx);
                }
                1 => {
                    chars.insert(idx, random_printable(&mut rng));
                }
                2 => {
                    chars[idx] = random_printable(&mut rng);
                }
                3 => {
                    let other = rng.next_u64() as usize % chars.len();
                    chars.swap(idx, other);
                }
                _ => {
                    let ch = chars[idx];
                    chars.insert(idx, ch);
                }
            }
        }

        chars.into_iter().collect()
    }
}

fn random_printable(rng: &mut SimpleRng) -> char {
    char::from_u32(0x20 + (rng.next_u64() % 95) as u32).unwrap_or(' ')
}

fn pick<'a, T>(items: &'a [T], rng: &mut SimpleRng) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.next_u64() as usize % items.len())
    }
}

/// Simple RNG for deterministic testing
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        Self {
            state: 0x853c_49e6_748f_ea9b,
        }
    }

    fn with_seed(seed: u64) -> Self {
        // XorShift state must be nonzero
        Self {
            state: if seed == 0 { 0x853c_49e6_748f_ea9b } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        // XorShift algorithm
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }
}
