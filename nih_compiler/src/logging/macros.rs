//! Logging macros. Context values accept anything that implements `Display`.

/// Log an error with a `Code`, an optional span and key/value context
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::error($code, $message)
                .with_span($span)
                $(.with_context($key, &format!("{}", $value)))*
        )
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::error($code, $message)
                $(.with_context($key, &format!("{}", $value)))*
        )
    };
}

/// Log a milestone reached with a success `Code`
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::success($code, $message)
                $(.with_context($key, &format!("{}", $value)))*
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::info($message)
                $(.with_context($key, &format!("{}", $value)))*
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::warning($message)
                $(.with_context($key, &format!("{}", $value)))*
        )
    };
}

/// Debug events are built only when the configured level admits them
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::dispatch(
                $crate::logging::LogEvent::debug($message)
                    $(.with_context($key, &format!("{}", $value)))*
            )
        }
    };
}

/// Milestone with a `duration_ms` entry, skipped when performance events are off
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::config::log_performance_events() {
            $crate::log_success!($code, $message,
                "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0)
                $(, $key => $value)*
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;
    use crate::utils::Span;

    #[test]
    fn test_macros_accept_display_values() {
        let tokens: usize = 5;
        let path = std::path::PathBuf::from("demo.nih");
        let duration = std::time::Duration::from_millis(3);

        log_error!(codes::syntax::EMPTY_LIST, "Empty list");
        log_error!(codes::syntax::EMPTY_LIST, "Empty list", span = Span::dummy());
        log_error!(codes::lexical::INVALID_CHARACTER, "Invalid character",
            span = Span::dummy(),
            "char" => '@',
            "offset" => 12
        );
        log_error!(codes::syntax::EMPTY_LIST, "Empty list", "depth" => 3);
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenized", "tokens" => tokens);
        log_info!("Compiling", "path" => path.display());
        log_warning!("Odd file name", "path" => path.display());
        log_debug!("Token dump", "count" => tokens);
        log_debug!("Plain debug");
        log_performance!(codes::success::COMPILATION_COMPLETE, "Compiled",
            duration = duration,
            "tokens" => tokens
        );
    }
}
