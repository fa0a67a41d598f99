use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = turnout_api::Args::parse();

	turnout_api::run(args).await
}
