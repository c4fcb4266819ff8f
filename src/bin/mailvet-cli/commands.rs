use std::fs;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use mailvet::{
    BatchJob, BatchRunner, Blacklist, CancelToken, Progress, ValidationResult, VerdictCounts,
    VerdictStatus, validate,
};

use crate::args::{BatchArgs, CheckArgs};
use crate::output;

// codes de sortie : 0 tout valide, 2 au moins un verdict non valide, 1 erreur fatale
const EXIT_NOT_DELIVERABLE: i32 = 2;

pub fn check(args: CheckArgs) -> Result<()> {
    let config = args.common.engine_config();
    let blacklist = load_blacklist(args.common.blacklist.as_deref())?;

    let result = validate(&args.email, &blacklist, &config);

    #[cfg(feature = "with-auth-records")]
    if args.auth {
        print_auth_records(&args.email);
    }

    let rows = vec![result];
    output::emit(&rows, &args.common.format, args.common.out.as_deref())?;

    if rows.iter().any(|row| row.status != VerdictStatus::Valid) {
        std::process::exit(EXIT_NOT_DELIVERABLE);
    }
    Ok(())
}

pub fn batch(args: BatchArgs) -> Result<()> {
    let mut config = args.common.engine_config();
    config.max_concurrency = args.concurrency;
    config.chunk_size = args.chunk_size;

    let blacklist = load_blacklist(args.common.blacklist.as_deref())?;
    let addresses = read_addresses(&args)?;

    let job = BatchJob::new(addresses, &blacklist);
    let runner = BatchRunner::new(config);
    let progress = Arc::new(Progress::new());
    let cancel = CancelToken::new();

    let sampler = args
        .progress
        .then(|| spawn_progress_sampler(Arc::clone(&progress)));

    let results = runner
        .run_with(&job, &progress, &cancel)
        .context("batch execution failed")?;

    if let Some((done_flag, handle)) = sampler {
        done_flag.store(true, Ordering::Relaxed);
        let _ = handle.join();
        eprintln!("{}/{} done", progress.completed(), progress.total());
    }

    output::emit(&results, &args.common.format, args.common.out.as_deref())?;
    print_summary(&results);

    if results.iter().any(|row| row.status != VerdictStatus::Valid) {
        std::process::exit(EXIT_NOT_DELIVERABLE);
    }
    Ok(())
}

fn load_blacklist(path: Option<&str>) -> Result<Blacklist> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read blacklist file {path}"))?;
            Ok(Blacklist::from_lines(&text))
        }
        None => Ok(Blacklist::new()),
    }
}

fn read_addresses(args: &BatchArgs) -> Result<Vec<String>> {
    if let Some(path) = &args.input {
        let text =
            fs::read_to_string(path).with_context(|| format!("read input file {path}"))?;
        return Ok(text.lines().map(str::to_string).collect());
    }
    if args.stdin {
        let mut addresses = Vec::new();
        for line in io::stdin().lock().lines() {
            addresses.push(line.context("read stdin")?);
        }
        return Ok(addresses);
    }
    bail!("specify --input FILE or --stdin");
}

fn spawn_progress_sampler(
    progress: Arc<Progress>,
) -> (Arc<AtomicBool>, thread::JoinHandle<()>) {
    let done = Arc::new(AtomicBool::new(false));
    let done_flag = Arc::clone(&done);
    let handle = thread::spawn(move || {
        while !done_flag.load(Ordering::Relaxed) {
            let total = progress.total();
            if total > 0 {
                eprint!("\r{}/{} done", progress.completed(), total);
            }
            thread::sleep(Duration::from_millis(200));
        }
        eprintln!();
    });
    (done, handle)
}

fn print_summary(results: &[ValidationResult]) {
    let counts = VerdictCounts::tally(results);
    eprintln!(
        "summary: {} valid, {} invalid, {} greylisted, {} blacklisted",
        counts.valid, counts.invalid, counts.greylisted, counts.blacklisted
    );
}

#[cfg(feature = "with-auth-records")]
fn print_auth_records(email: &str) {
    use mailvet::{ValidationMode, validate_syntax};

    let Ok(address) = validate_syntax(email, ValidationMode::Relaxed) else {
        return;
    };
    match mailvet::check_sender_records(&address.ascii_domain) {
        Ok(status) => {
            println!("SPF:   {}", output::describe_spf(&status.spf));
            println!("DMARC: {}", output::describe_dmarc(&status.dmarc));
        }
        Err(err) => eprintln!("auth records lookup failed: {err}"),
    }
}
