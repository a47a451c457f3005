use anyhow::Result;
use clap::{Parser, Subcommand};
use scout_scripts::{logger, CompanyDetailsJob, Config, DriveExplorer, EmployeeCounterJob};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// 数据收集脚本
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 配置文件（默认读取当前目录下的 scout.toml）
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// 显示浏览器窗口（需要人工处理验证码时使用）
    #[arg(long, global = true)]
    headed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 抓取公司主页详情并以表格输出
    CompanyDetails {
        /// 同时把详情写入该 CSV 文件
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// 从 LinkedIn 查询员工数并写回 CSV
    CountEmployees {
        /// 结果文件（默认覆盖当前目录下与输入同名的文件）
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Google Drive 文件
    Drive {
        #[command(subcommand)]
        action: Option<DriveAction>,
    },
}

#[derive(Subcommand, Debug)]
enum DriveAction {
    /// 列出文件
    List,
    /// 按关键词匹配文件名
    Search {
        /// 需要按顺序连续出现的关键词
        #[arg(required = true)]
        keywords: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // 初始化日志
    logger::init(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // 加载配置
    let mut config = Config::load(args.config.as_deref())?;
    if args.headed {
        config.headless = false;
    }

    match args.command {
        Command::CompanyDetails { output } => CompanyDetailsJob::new(config, output).run().await,
        Command::CountEmployees { output } => EmployeeCounterJob::new(config, output).run().await,
        Command::Drive { action } => {
            let keywords = match action {
                Some(DriveAction::Search { keywords }) => keywords,
                Some(DriveAction::List) | None => Vec::new(),
            };
            DriveExplorer::new(config).run(&keywords).await
        }
    }
}
