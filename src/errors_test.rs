#[cfg(test)]
mod tests {
    use super::super::*;
    use std::time::Duration;

    #[test]
    fn test_exit_codes() {
        assert_eq!(AwxpilotError::Other(anyhow::anyhow!("boom")).exit_code(), 1);
        assert_eq!(
            AwxpilotError::ElementNotFound("#source_path".into()).exit_code(),
            2
        );
        assert_eq!(AwxpilotError::LoginFailed.exit_code(), 3);
        assert_eq!(AwxpilotError::SessionStart("refused".into()).exit_code(), 4);
        assert_eq!(
            AwxpilotError::WaitTimeout {
                selector: ".pf-c-page__main".into(),
                timeout: Duration::from_secs(10),
            }
            .exit_code(),
            5
        );
        assert_eq!(AwxpilotError::UnknownProfile("qa".into()).exit_code(), 6);
    }

    #[test]
    fn test_typed_variant_survives_anyhow_round_trip() {
        let err: anyhow::Error = AwxpilotError::LoginFailed.into();
        let recovered: AwxpilotError = err.into();
        assert!(matches!(recovered, AwxpilotError::LoginFailed));
    }

    #[test]
    fn test_plain_anyhow_classifies_as_other() {
        let err = anyhow::anyhow!("chromedriver exploded");
        let recovered: AwxpilotError = err.into();
        assert!(matches!(recovered, AwxpilotError::Other(_)));
        assert_eq!(recovered.exit_code(), 1);
    }

    #[test]
    fn test_element_not_found_message_names_selector() {
        let err = AwxpilotError::ElementNotFound("#host-filter".into());
        assert!(err.to_string().contains("#host-filter"));
    }
}
