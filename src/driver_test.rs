#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_command_exists() {
        #[cfg(unix)]
        {
            assert!(ChromedriverManager::command_exists("ls"));
            assert!(!ChromedriverManager::command_exists(
                "nonexistent_command_12345"
            ));
        }

        #[cfg(windows)]
        {
            assert!(ChromedriverManager::command_exists("cmd"));
            assert!(!ChromedriverManager::command_exists(
                "nonexistent_command_12345"
            ));
        }
    }

    #[test]
    fn test_find_free_port() {
        let port = ChromedriverManager::find_free_port().unwrap();
        assert!(port > 0);
    }

    #[test]
    fn test_is_port_in_use() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(ChromedriverManager::is_port_in_use(port));
    }

    #[tokio::test]
    async fn test_is_driver_ready_dead_port() {
        assert!(!ChromedriverManager::is_driver_ready("http://localhost:65432").await);
    }

    #[test]
    fn test_stop_all_empty() {
        let manager = ChromedriverManager::new();
        // Should not panic even with no processes
        manager.stop_all();
    }
}
