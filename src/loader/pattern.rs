//! Snapshot file name patterns

use regex::Regex;

use super::errors::{LoaderError, LoaderResult};

/// Glob over bare file names.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one character, everything else is literal. The whole name must match.
#[derive(Debug, Clone)]
pub struct FilePattern {
    glob: String,
    regex: Regex,
}

impl FilePattern {
    /// Compile a glob
    pub fn new(glob: &str) -> LoaderResult<Self> {
        if glob.is_empty() {
            return Err(LoaderError::InvalidPattern {
                pattern: glob.to_string(),
                reason: "pattern is empty".to_string(),
            });
        }

        let mut source = String::with_capacity(glob.len() + 8);
        source.push('^');
        for c in glob.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                c => source.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| LoaderError::InvalidPattern {
            pattern: glob.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    /// Check a bare file name against the pattern
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    /// The glob this pattern was compiled from
    pub fn as_str(&self) -> &str {
        &self.glob
    }
}
