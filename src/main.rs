use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match kb_bootstrap_lib::run().await {
        Ok(response) => {
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!(error = %e, "failed to serialize response"),
            }
            if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "kb-bootstrap could not start");
            eprintln!("kb-bootstrap: {e}");
            ExitCode::FAILURE
        }
    }
}
