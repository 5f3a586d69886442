//! Path pattern compiler.
//!
//! Compiles slash-delimited paths like `forms/N/tags/T` into tagged segments.
//! A segment made of a single uppercase ASCII letter is an iteration variable;
//! every other segment is a literal object key.

use std::fmt;

use thiserror::Error;

pub const SEGMENT_DELIMITER: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("variable `{variable}` is bound twice in pattern `{pattern}`")]
    DuplicateVariable { pattern: String, variable: char },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches an object key verbatim.
    Literal(String),
    /// Matches every index of an array and binds it.
    Variable(char),
}

impl Segment {
    fn from_text(text: &str) -> Self {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_uppercase() => Segment::Variable(ch),
            _ => Segment::Literal(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern. The empty string compiles to a pattern with no
    /// segments, which addresses the document root.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut seen = Vec::new();

        if !source.is_empty() {
            for text in source.split(SEGMENT_DELIMITER) {
                let segment = Segment::from_text(text);
                if let Segment::Variable(variable) = segment {
                    if seen.contains(&variable) {
                        return Err(PatternError::DuplicateVariable {
                            pattern: source.to_string(),
                            variable,
                        });
                    }
                    seen.push(variable);
                }
                segments.push(segment);
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Variables in the order they appear in the path.
    pub fn variables(&self) -> impl Iterator<Item = char> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Variable(v) => Some(*v),
            Segment::Literal(_) => None,
        })
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literals_and_variables() {
        let pattern = PathPattern::parse("senses/N/examples/M/roman").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("senses".to_string()),
                Segment::Variable('N'),
                Segment::Literal("examples".to_string()),
                Segment::Variable('M'),
                Segment::Literal("roman".to_string()),
            ]
        );
        assert_eq!(pattern.variables().collect::<Vec<_>>(), vec!['N', 'M']);
    }

    #[test]
    fn single_literal() {
        let pattern = PathPattern::parse("lang_code").unwrap();
        assert_eq!(
            pattern.segments(),
            &[Segment::Literal("lang_code".to_string())]
        );
        assert_eq!(pattern.variables().count(), 0);
    }

    #[test]
    fn lowercase_single_letter_is_literal() {
        let pattern = PathPattern::parse("a/B").unwrap();
        assert_eq!(
            pattern.segments(),
            &[Segment::Literal("a".to_string()), Segment::Variable('B')]
        );
    }

    #[test]
    fn multi_letter_uppercase_is_literal() {
        let pattern = PathPattern::parse("IPA").unwrap();
        assert_eq!(pattern.segments(), &[Segment::Literal("IPA".to_string())]);
    }

    #[test]
    fn empty_pattern_has_no_segments() {
        let pattern = PathPattern::parse("").unwrap();
        assert!(pattern.segments().is_empty());
    }

    #[test]
    fn duplicate_variable_is_rejected() {
        let err = PathPattern::parse("forms/N/tags/N").unwrap_err();
        assert_eq!(
            err,
            PatternError::DuplicateVariable {
                pattern: "forms/N/tags/N".to_string(),
                variable: 'N',
            }
        );
        assert!(err.to_string().contains("`N`"));
    }

    #[test]
    fn display_round_trips_source() {
        let pattern = PathPattern::parse("forms/A/tags/C").unwrap();
        assert_eq!(pattern.to_string(), "forms/A/tags/C");
        assert_eq!(pattern.as_str(), "forms/A/tags/C");
    }
}
