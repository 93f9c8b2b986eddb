use clap::Parser;
use lazylist::{Key, infra};

#[derive(Parser)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Sequence name, e.g. fib
    #[arg(required_unless_present = "list")]
    sequence: Option<String>,
    /// Keys in subscript syntax: 10, -1, 3:7, :5, 10:, ::2
    #[arg(allow_hyphen_values = true)]
    keys: Vec<Key>,
    /// Most values printed for one slice
    #[arg(long, default_value_t = 20)]
    limit: usize,
    /// Print the list's realized prefix after evaluating
    #[arg(long)]
    describe: bool,
    /// List the known sequences and exit
    #[arg(long)]
    list: bool,
}

fn enable_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    enable_tracing();
    let cli = Cli::parse();
    if cli.list {
        for name in infra::names() {
            println!("{name}");
        }
        return Ok(());
    }
    let Some(sequence) = cli.sequence else {
        anyhow::bail!("missing sequence name");
    };
    let req = infra::Request {
        keys: cli.keys,
        limit: cli.limit,
        describe: cli.describe,
    };
    for line in infra::dispatch(&sequence, &req)? {
        println!("{line}");
    }
    Ok(())
}
