/// Configuration options for the packrat parser.
///
/// Parsing uses ordered choice (first match wins) with possessive
/// repetition and memoization (packrat parsing). This struct customizes
/// the evaluator without touching the grammar.
///
/// # Example
///
/// ```rust
/// use thicket::ParserConfig;
///
/// // Use default configuration
/// let config = ParserConfig::default();
///
/// // Or customize it
/// let config = ParserConfig {
///     enable_memoization: false, // re-evaluate rules at repeated positions
///     max_recursion_depth: 256,  // tighter nesting limit
/// };
/// # let _ = config;
/// ```
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Enable memoization (packrat parsing).
    ///
    /// When enabled, each rule's outcome at each position is computed at
    /// most once per parse, giving linear-time parsing for grammars with
    /// heavy backtracking. Disabling it trades time for memory.
    pub enable_memoization: bool,

    /// Maximum expression nesting depth before the parse is aborted
    /// with [`ParseError::DepthExceeded`](crate::error::ParseError::DepthExceeded).
    pub max_recursion_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            enable_memoization: true,
            max_recursion_depth: 1024,
        }
    }
}
