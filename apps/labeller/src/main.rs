//! 全息断层图像中心点标注终端工具.
//!
//! 两个视图的切片会被导出为 PNG, 标注者查看图片后在终端输入新的屏幕坐标.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use holo_center::prelude::*;
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

mod picker;
mod report;
mod runner;

#[derive(Parser, Debug)]
#[command(author, about, version, long_about = None)]
struct Cli {
    /// SQLite 数据库文件. 默认为 `$HOLO_CENTER_DB`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// 体数据仓库根目录. 默认为 `$HOLO_CENTER_DATA_DIR`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// 下载缓存目录. 默认为 `$HOLO_CENTER_CACHE_DIR`.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// 先把体数据复制到缓存目录再打开.
    #[arg(long, global = true)]
    fetch: bool,

    /// 输出调试日志.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Target {
    /// 项目名.
    #[arg(short, long)]
    project: String,

    /// 图像编号.
    #[arg(short, long)]
    image_id: i64,
}

impl Target {
    fn identity(&self) -> ImageIdentity {
        ImageIdentity::new(self.project.as_str(), self.image_id)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 交互式标注.
    Label {
        #[command(flatten)]
        target: Target,

        /// 预览图目录.
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// 打印中心点, 可选导出两个视图.
    Show {
        #[command(flatten)]
        target: Target,

        /// 预览图目录.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// 列出项目中已保存的中心点.
    List {
        /// 项目名.
        #[arg(short, long)]
        project: String,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::from_env_or_home();
        if let Some(p) = &self.db {
            config.database = p.clone();
        }
        if let Some(p) = &self.data_dir {
            config.data_dir = p.clone();
        }
        if let Some(p) = &self.cache_dir {
            config.cache_dir = p.clone();
        }
        config
    }

    fn locator(&self, config: &Config) -> Box<dyn VolumeLocator> {
        let repo = DirectoryLocator::new(&config.data_dir);
        if self.fetch {
            Box::new(FetchLocator::new(
                repo,
                CopyFetcher::new(&config.data_dir),
                &config.cache_dir,
            ))
        } else {
            Box::new(repo)
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.config();
    let store = SqliteCenterStore::open(&config.database)?;
    let stdout = io::stdout();
    let mut w = stdout.lock();

    match &cli.command {
        Command::Label { target, out } => {
            let mut session = CenterLabellerSession::new(store, cli.locator(&config));
            runner::label(&mut session, target.identity(), out, io::stdin())?;
        }
        Command::Show { target, out } => {
            let mut session = CenterLabellerSession::new(store, cli.locator(&config));
            let transition = session.select(Some(target.identity()))?;
            report::describe_session_into(&session, transition, &mut w)?;
            if let Some(out) = out {
                for path in runner::export_views(&session, out)? {
                    writeln!(w, "Exported {}", path.display())?;
                }
            }
        }
        Command::List { project } => {
            let count = store.count(project)?;
            let rows = store.list(project)?;
            report::describe_centers_into(project, count, &rows, &mut w)?;
        }
    }
    w.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = SimpleLogger::new().with_level(level).env().init() {
        eprintln!("Unable to initialize logger: {e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
