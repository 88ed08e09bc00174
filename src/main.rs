//! # 图片来源加载器 — 命令行入口
//!
//! 本文件只负责参数解析、日志初始化与结果输出，
//! 加载逻辑全部位于 `image_loader` 模块，详见 `lib.rs` 架构文档。
//!
//! ```text
//! image-loader [--config <path>] [--file <path> | --blob <path> | --json <value> | <text>]...
//! ```
//!
//! 每个输入输出一行 JSON（`{"src":..}` 或 `{"src":..,"alt":..}`），
//! 任一输入失败时退出码为 1。

use std::path::PathBuf;
use std::process::ExitCode;

use image_loader::settings::{self, CONFIG_ENV_VAR};
use image_loader::{AppError, Blob, FileHandle, ImageInput, ImageLoader, LoadedImage, LoaderConfig};

#[derive(Debug, PartialEq, Eq)]
enum CliInput {
    Text(String),
    File(PathBuf),
    Blob(PathBuf),
    Json(String),
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    config: Option<PathBuf>,
    inputs: Vec<CliInput>,
}

fn parse_args<I>(args: I) -> Result<CliArgs, AppError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value_for(&mut args, "--config")?)),
            "--file" => parsed.inputs.push(CliInput::File(PathBuf::from(value_for(&mut args, "--file")?))),
            "--blob" => parsed.inputs.push(CliInput::Blob(PathBuf::from(value_for(&mut args, "--blob")?))),
            "--json" => parsed.inputs.push(CliInput::Json(value_for(&mut args, "--json")?)),
            "--" => parsed.inputs.extend(args.by_ref().map(CliInput::Text)),
            flag if flag.starts_with("--") => {
                return Err(AppError::Config(format!("unknown option {}", flag)));
            }
            _ => parsed.inputs.push(CliInput::Text(arg)),
        }
    }

    if parsed.inputs.is_empty() {
        return Err(AppError::Config("no input given".to_string()));
    }
    Ok(parsed)
}

fn value_for(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, AppError> {
    args.next()
        .ok_or_else(|| AppError::Config(format!("missing value for {}", flag)))
}

fn resolve_config(cli_path: Option<PathBuf>) -> Result<LoaderConfig, AppError> {
    match cli_path.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)) {
        Some(path) => settings::load_config_from_path(&path),
        None => Ok(LoaderConfig::default()),
    }
}

async fn load_one(loader: &ImageLoader, input: CliInput) -> Result<LoadedImage, AppError> {
    let loaded = match input {
        CliInput::Text(text) => loader.load_anything(ImageInput::Text(text)).await?,
        CliInput::File(path) => loader.load_anything(FileHandle::new(path).into()).await?,
        CliInput::Blob(path) => {
            let bytes = tokio::fs::read(&path).await?;
            loader.load_anything(Blob::new(bytes).into()).await?
        }
        CliInput::Json(raw) => {
            let value = serde_json::from_str::<serde_json::Value>(&raw)
                .map_err(|e| AppError::Config(format!("invalid --json value: {}", e)))?;
            loader.load_value(&value).await?
        }
    };
    Ok(loaded)
}

async fn run(args: CliArgs) -> Result<bool, AppError> {
    let config = resolve_config(args.config)?;
    let loader = ImageLoader::new(config)?;
    let mut all_ok = true;

    for input in args.inputs {
        match load_one(&loader, input).await {
            Ok(loaded) => {
                // 引用 URL 只在本进程内有效，输出后立即释放
                let content = loaded.release();
                let line = serde_json::to_string(&content)
                    .map_err(|e| AppError::Config(format!("failed to render result: {}", e)))?;
                println!("{}", line);
            }
            Err(err) => {
                log::error!("加载失败: {}", err);
                all_ok = false;
            }
        }
    }

    Ok(all_ok)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            log::error!("{}", err);
            eprintln!(
                "usage: image-loader [--config <path>] [--file <path> | --blob <path> | --json <value> | <text>]..."
            );
            return ExitCode::from(2);
        }
    };

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
