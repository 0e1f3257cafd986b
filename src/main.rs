use clap::Parser;
use strength_serve::utils::error::ErrorCategory;
use strength_serve::utils::{logger, validation::Validate};
use strength_serve::{ServeArgs, StrengthError, StrengthPredictor};

fn exit_with(e: &StrengthError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?})",
        e,
        e.category()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.category() {
        ErrorCategory::Config => 2,
        ErrorCategory::Model => 3,
        _ => 1,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = ServeArgs::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(args.verbose);
            exit_with(&e);
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }

    tracing::info!("🚀 Starting concrete strength prediction API");
    tracing::debug!("Service config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    // 模型載入失敗時不接受任何請求
    tracing::info!("📁 Loading model from: {}", config.model.path);
    let predictor = match StrengthPredictor::from_config(&config) {
        Ok(predictor) => predictor,
        Err(e) => exit_with(&e),
    };

    strength_serve::server::run_server(config, predictor).await?;
    Ok(())
}
