//! Parser configuration.

/// Settings applied when parsing a publication.
///
/// Options are frozen once a [`SchedulesParser`](crate::SchedulesParser)
/// is constructed; a parser instance may be shared across threads.
///
/// To create a mutable options instance, see
/// [`ParserOptions::builder`] or [`ParserOptions::default`].
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct ParserOptions {
    /// Reserved for future use; currently has no effect on parsing.
    ///
    /// Default: `false`
    pub strict: bool,
    /// Extract normalized dates, durations in minutes, and part types
    /// for languages with an enhanced profile.
    ///
    /// When disabled, or when the publication language has no profile,
    /// schedule fields carry the source text verbatim.
    ///
    /// Default: `true`
    pub enhanced_parsing: bool,
    /// Cap on the input size and on the total decompressed size of
    /// any archive read during parsing.
    ///
    /// Default: 20 MiB
    pub max_total_bytes: u64,
    /// Cap on the number of entries in any archive read during parsing.
    ///
    /// Default: `300`
    pub max_entries: usize,
}

impl ParserOptions {
    /// Returns a builder to create a [`ParserOptions`] instance.
    pub fn builder() -> ParserOptionsBuilder {
        ParserOptionsBuilder(Self::default())
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            strict: false,
            enhanced_parsing: true,
            max_total_bytes: 20 * 1024 * 1024,
            max_entries: 300,
        }
    }
}

impl From<ParserOptionsBuilder> for ParserOptions {
    fn from(value: ParserOptionsBuilder) -> Self {
        value.build()
    }
}

/// Builder to construct a [`ParserOptions`] instance.
///
/// # Examples
/// ```
/// # use jwsched::{ParserOptions, SchedulesParser};
/// let parser = SchedulesParser::with_options(
///     ParserOptions::builder()
///         .enhanced_parsing(false)
///         .max_total_bytes(4 * 1024 * 1024),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ParserOptionsBuilder(ParserOptions);

impl ParserOptionsBuilder {
    /// Turn this builder into a [`ParserOptions`] instance.
    pub fn build(self) -> ParserOptions {
        self.0
    }

    /// See [`ParserOptions::strict`].
    pub fn strict(mut self, strict: bool) -> Self {
        self.0.strict = strict;
        self
    }

    /// See [`ParserOptions::enhanced_parsing`].
    pub fn enhanced_parsing(mut self, enhanced_parsing: bool) -> Self {
        self.0.enhanced_parsing = enhanced_parsing;
        self
    }

    /// See [`ParserOptions::max_total_bytes`].
    pub fn max_total_bytes(mut self, max_total_bytes: u64) -> Self {
        self.0.max_total_bytes = max_total_bytes;
        self
    }

    /// See [`ParserOptions::max_entries`].
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.0.max_entries = max_entries;
        self
    }
}
