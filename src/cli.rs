use std::path::PathBuf;

use clap::Parser;

/// Serve PDF files from local directories through an S3-style GET API
#[derive(Parser, Debug)]
#[command(
    version,
    after_help = "Examples:\n  pdf-bucket-server --bucket mybucket=/path/to/bucket --port 8000\n  pdf-bucket-server --bucket docs=/home/user/docs --bucket images=/home/user/images"
)]
pub struct Cli {
    /// Bucket definition in NAME=PATH form; repeat for multiple buckets
    #[clap(short, long = "bucket", value_name = "NAME=PATH", value_parser = parse_bucket_spec)]
    pub buckets: Vec<(String, PathBuf)>,

    /// Port to listen on (default 8000)
    #[clap(short, long, env = "PDFBUCKET_PORT")]
    pub port: Option<u16>,

    /// Address to bind (default 0.0.0.0)
    #[clap(long, env = "PDFBUCKET_HOST")]
    pub host: Option<String>,

    /// Tokio worker threads (default: CPU cores)
    #[clap(long, env = "PDFBUCKET_WORKERS")]
    pub workers: Option<usize>,

    /// Configuration file; a missing file is ignored
    #[clap(short, long, default_value = "config.toml", env = "PDFBUCKET_CONFIG")]
    pub config: String,
}

/// Parse `NAME=PATH`, splitting on the first `=`
pub fn parse_bucket_spec(spec: &str) -> Result<(String, PathBuf), String> {
    let Some((name, path)) = spec.split_once('=') else {
        return Err(format!(
            "bucket must be given in 'name=path' form: {spec}"
        ));
    };
    if name.is_empty() || path.is_empty() {
        return Err(format!("bucket name or path is empty: {spec}"));
    }
    Ok((name.to_string(), PathBuf::from(path)))
}
