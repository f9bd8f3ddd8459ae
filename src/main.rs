use ytg_rs::{notify::TerminalNotifier, service::YoutubeService, worker};

// Downloads run strictly one at a time, so a single-threaded runtime is all
// that is needed.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    // Read url and optional resolution from args
    let url = std::env::args().nth(1).expect("No url provided");
    let res = std::env::args().nth(2).unwrap_or_default();

    // Create the notification sink and the extraction backend
    let notifier = TerminalNotifier::new(true);
    let service = YoutubeService::new().expect("Could not create HttpClient");

    if let Err(e) = worker::download(&service, &notifier, &url, &res).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
