#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = bugboard_lib::run().await {
        let body = bugboard_lib::ApiErrorBody::from(&e);
        log::error!("{}", body.message);
        log::error!("{}", body.recovery_suggestion);
        std::process::exit(1);
    }
}
