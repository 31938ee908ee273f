use dental_experts::{config::ServerConfig, context::AppContext, error::ClinicResult, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ClinicResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dental_experts=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Seed the initial admin account when provided
    if let (Ok(username), Ok(password)) = (
        std::env::var("CLINIC_ADMIN_USER"),
        std::env::var("CLINIC_ADMIN_PASSWORD"),
    ) {
        ctx.admins.seed(&username, &password).await?;
    }

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ____             __        __   ______                      __
   / __ \___  ____  / /_____ _/ /  / ____/  ______  ___  _____ / /______
  / / / / _ \/ __ \/ __/ __ `/ /  / __/ | |/_/ __ \/ _ \/ ___// __/ ___/
 / /_/ /  __/ / / / /_/ /_/ / /  / /____>  </ /_/ /  __/ /   / /_(__  )
/_____/\___/_/ /_/\__/\__,_/_/  /_____/_/|_/ .___/\___/_/    \__/____/
                                          /_/
        Clinic Management Server v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
