use eyre::{Context, Result};
use gemchat::app::{App, TerminalRenderer};
use gemchat::backend::{ResponseClient, new_backend};
use gemchat::cli::Command;
use gemchat::config::{Configuration, init_logger, verbose};
use gemchat::storage::new_storage;
use gemchat::store::ConversationStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let config = cmd.get_config()?;
    init_logger(&config.log)?;
    Configuration::init(config.clone())?;
    verbose!("[+] Logger initialized");

    verbose!("[+] Initializing backend...");
    let backend = new_backend(&config);
    let client = ResponseClient::new(backend).with_strict(config.backend.strict);
    if client.strict() {
        verbose!("[+] Strict mode enabled");
    }

    verbose!("[+] Initializing storage...");
    let storage = new_storage(&config.storage)
        .await
        .wrap_err("initializing storage")?;
    verbose!("[+] Storage initialized");

    verbose!("[+] Restoring conversations...");
    let store = ConversationStore::restore(storage).await;
    verbose!("[+] Restored {} conversations", store.history().len());

    let renderer = TerminalRenderer::new(std::io::stdout());
    let mut app = App::new(store, client, renderer);
    app.startup();

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    if let Err(err) = app.run(input).await {
        log::error!("Chat session failed: {:#}", err);
        eprintln!("Error: {:#}", err);
    }

    Ok(())
}
