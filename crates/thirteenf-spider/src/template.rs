use crate::error::{SpiderError, TemplateError};
use crate::fs::{read_json, write_atomic};
use crate::holdings::HoldingsDocument;
use std::path::Path;
use tracing::{debug, info};

/// Sentinel in the dashboard template replaced by the holdings JSON.
pub const PLACEHOLDER: &str = "__HOLDINGS_DATA__";

/// Replaces the single [`PLACEHOLDER`] in `template` with `json`.
///
/// ```rust
/// use thirteenf_spider::template::inject;
///
/// let html = inject(r#"{"a":1}"#, "<script>const DATA = __HOLDINGS_DATA__;</script>").unwrap();
/// assert_eq!(html, r#"<script>const DATA = {"a":1};</script>"#);
/// ```
pub fn inject(json: &str, template: &str) -> Result<String, TemplateError> {
    match template.matches(PLACEHOLDER).count() {
        0 => Err(TemplateError::PlaceholderMissing(PLACEHOLDER)),
        1 => Ok(template.replacen(PLACEHOLDER, json, 1)),
        count => Err(TemplateError::PlaceholderRepeated {
            placeholder: PLACEHOLDER,
            count,
        }),
    }
}

/// Compact JSON as `JSON.stringify` would produce it; non-ASCII is not escaped.
pub fn to_json(document: &HoldingsDocument) -> Result<String, SpiderError> {
    Ok(serde_json::to_string(document)?)
}

/// Reads the holdings document and template, injects, writes `output` atomically.
pub async fn inject_file(
    document: impl AsRef<Path>,
    template: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<(), SpiderError> {
    let (document, template, output) = (document.as_ref(), template.as_ref(), output.as_ref());

    let holdings: HoldingsDocument = read_json(document).await?;
    debug!("{} funds read from {}", holdings.len(), document.display());

    let html = tokio::fs::read_to_string(template)
        .await
        .map_err(|err| SpiderError::io(template, err))?;

    let html = inject(&to_json(&holdings)?, &html)?;
    write_atomic(output, html.as_bytes()).await?;

    info!("dashboard written to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<html><script>window.HOLDINGS = __HOLDINGS_DATA__;</script></html>";

    #[test]
    fn replaces_exactly_once() {
        let html = inject(r#"{"1067983":{"manager":"워런 버핏"}}"#, TEMPLATE).unwrap();
        assert!(!html.contains(PLACEHOLDER));
        assert!(html.contains(r#"window.HOLDINGS = {"1067983":{"manager":"워런 버핏"}};"#));
    }

    #[test]
    fn idempotent() {
        let json = r#"{"k":"v"}"#;
        assert_eq!(inject(json, TEMPLATE), inject(json, TEMPLATE));
    }

    #[test]
    fn missing_or_repeated_placeholder() {
        assert_eq!(
            inject("{}", "<html></html>"),
            Err(TemplateError::PlaceholderMissing(PLACEHOLDER))
        );
        assert_eq!(
            inject("{}", "__HOLDINGS_DATA__ __HOLDINGS_DATA__"),
            Err(TemplateError::PlaceholderRepeated {
                placeholder: PLACEHOLDER,
                count: 2
            })
        );
    }

    #[test]
    fn json_keeps_non_ascii() {
        let json = to_json(&HoldingsDocument::new()).unwrap();
        assert_eq!(json, "{}");
        assert_eq!(serde_json::to_string("크리스 혼").unwrap(), "\"크리스 혼\"");
    }
}
