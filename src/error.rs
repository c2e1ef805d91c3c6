//! Helpers for rendering errors as user-facing text.

use std::error::Error;

/// Render `err` followed by every error in its `source()` chain, joined by `: `.
///
/// Transport errors from reqwest only name the failed request at the top
/// level; the actual cause (refused connection, DNS, TLS, timeout) lives
/// further down the chain.
pub fn describe(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // Some layers repeat their source's text in their own message.
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layer {
        text: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.text)
        }
    }

    impl Error for Layer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.source.as_deref().map(|s| s as &(dyn Error + 'static))
        }
    }

    #[test]
    fn joins_the_source_chain() {
        let err = Layer {
            text: "error sending request",
            source: Some(Box::new(Layer {
                text: "tcp connect error",
                source: Some(Box::new(Layer {
                    text: "Connection refused (os error 111)",
                    source: None,
                })),
            })),
        };
        assert_eq!(
            describe(&err),
            "error sending request: tcp connect error: Connection refused (os error 111)"
        );
    }

    #[test]
    fn single_error_is_unchanged() {
        let err = Layer {
            text: "boom",
            source: None,
        };
        assert_eq!(describe(&err), "boom");
    }

    #[test]
    fn repeated_cause_is_not_duplicated() {
        let err = Layer {
            text: "client error: timed out",
            source: Some(Box::new(Layer {
                text: "timed out",
                source: None,
            })),
        };
        assert_eq!(describe(&err), "client error: timed out");
    }
}
