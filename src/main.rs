use pr_commenter::{cli, ui::output};

#[tokio::main]
async fn main() {
    if let Err(err) = cli::run().await {
        output::report_failure(format!("{:#}", err));
        std::process::exit(1);
    }
}
