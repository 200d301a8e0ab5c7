use std::error::Error as StdError;
use std::io::ErrorKind;

use crate::error::ChatError;

fn error_chain_has_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == ErrorKind::ConnectionRefused
        {
            return true;
        }

        if source
            .to_string()
            .to_ascii_lowercase()
            .contains("connection refused")
        {
            return true;
        }

        current = source.source();
    }

    false
}

fn error_chain_has_timeout(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == ErrorKind::TimedOut
        {
            return true;
        }

        if source
            .to_string()
            .to_ascii_lowercase()
            .contains("timed out")
        {
            return true;
        }

        current = source.source();
    }

    false
}

pub(crate) fn request_error(err: reqwest::Error, api_url: &str, timeout_secs: u64) -> ChatError {
    if err.is_timeout() || error_chain_has_timeout(&err) {
        return ChatError::Transport(format!(
            "Request to the Gemini API timed out after {}s while calling '{}'. \
             Check network connectivity and model responsiveness.",
            timeout_secs, api_url
        ));
    }

    if err.is_connect() {
        if error_chain_has_connection_refused(&err) {
            return ChatError::Transport(format!(
                "Connection refused by the Gemini API at '{}'. \
                 Check the endpoint address and network connectivity.",
                api_url
            ));
        }

        return ChatError::Transport(format!(
            "Failed to connect to the Gemini API at '{}'. \
             Check network connectivity.",
            api_url
        ));
    }

    ChatError::Transport(format!(
        "Failed to call the Gemini API at '{}': {}",
        api_url, err
    ))
}
