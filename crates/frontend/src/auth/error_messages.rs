//! User-friendly login error messages

use gallery_core::LoginOutcome;

/// Message to show after a login attempt, `None` on success
pub fn login_error_message(outcome: &LoginOutcome) -> Option<String> {
    let message = match outcome {
        LoginOutcome::Success(_) => return None,
        LoginOutcome::InvalidCredentials => "Invalid email or password.".to_string(),
        LoginOutcome::Rejected { status: 400, .. } => {
            "Email and password are required.".to_string()
        }
        LoginOutcome::Rejected { status, .. } if *status >= 500 => {
            "The server could not process the login. Please try again later.".to_string()
        }
        LoginOutcome::Rejected { message, .. } if !message.is_empty() => message.clone(),
        LoginOutcome::Rejected { status, .. } => format!("Login failed (status {status})."),
        LoginOutcome::MalformedResponse(_) => {
            "The server sent an unexpected response.".to_string()
        }
        LoginOutcome::NetworkError(_) => {
            "Could not reach the server. Check your connection.".to_string()
        }
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::User;

    #[test]
    fn test_success_has_no_message() {
        let user = User::from_json(r#"{"userid":"u1"}"#).unwrap();
        assert_eq!(login_error_message(&LoginOutcome::Success(user)), None);
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            login_error_message(&LoginOutcome::InvalidCredentials).as_deref(),
            Some("Invalid email or password.")
        );
        assert_eq!(
            login_error_message(&LoginOutcome::Rejected {
                status: 400,
                message: "Email and password are required".into()
            })
            .as_deref(),
            Some("Email and password are required.")
        );
        assert!(
            login_error_message(&LoginOutcome::Rejected {
                status: 503,
                message: "stack trace".into()
            })
            .unwrap()
            .contains("try again later")
        );
        assert_eq!(
            login_error_message(&LoginOutcome::Rejected {
                status: 403,
                message: "Account locked".into()
            })
            .as_deref(),
            Some("Account locked")
        );
        assert_eq!(
            login_error_message(&LoginOutcome::Rejected {
                status: 204,
                message: String::new()
            })
            .as_deref(),
            Some("Login failed (status 204).")
        );
        assert!(
            login_error_message(&LoginOutcome::NetworkError("refused".into()))
                .unwrap()
                .contains("connection")
        );
    }
}
