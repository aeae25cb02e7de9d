#[cfg(test)]
mod tests {
    use super::super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_by_id_to_css() {
        assert_eq!(By::id("source_path").to_css(), "#source_path");
    }

    #[test]
    fn test_by_class_to_css() {
        assert_eq!(By::class("pf-m-primary").to_css(), ".pf-m-primary");
    }

    #[test]
    fn test_by_css_passthrough() {
        let raw = "button[aria-label='Search submit button']";
        assert_eq!(By::css(raw).to_css(), raw);
    }

    #[test]
    fn test_by_display_matches_css() {
        let by = By::class("pf-c-check__input");
        assert_eq!(by.to_string(), by.to_css());
    }
}
