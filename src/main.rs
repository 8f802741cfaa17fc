use std::thread;
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use chunkpipe::{ChunkPipe, PipeConfig};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chunkpipe", about = "Chunked double-ended pipe buffer driver")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. `info`, `chunkpipe=trace`).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the reference push/pop/traversal scenarios and print the results.
    Demo,
    /// Push batches from several producer threads while one consumer drains.
    Stress {
        /// Number of producer threads.
        #[arg(long, default_value_t = 4)]
        producers: usize,
        /// Batches pushed by each producer.
        #[arg(long, default_value_t = 1_000)]
        batches: usize,
        /// Values per batch (batches up to 8 values take the small-append path).
        #[arg(long, default_value_t = 256)]
        batch_len: usize,
        /// Coalescing threshold for the final streamed read-back.
        #[arg(long, default_value_t = chunkpipe::pipe::BATCH_CAPACITY)]
        stream_batch: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Demo => run_demo()?,
        Commands::Stress {
            producers,
            batches,
            batch_len,
            stream_batch,
        } => run_stress(producers, batches, batch_len, stream_batch)?,
    }

    Ok(())
}

fn init_tracing(default_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("invalid log level '{}'", default_level))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .init();
    Ok(())
}

fn run_demo() -> Result<()> {
    let pipe = ChunkPipe::new();
    pipe.push(vec![1, 2, 3]).push(vec![4, 5]);
    println!("range       = {:?}", pipe.range());
    println!("get(3)      = {:?}", pipe.get(3));
    println!("get(10)     = {:?}", pipe.get(10));

    let pipe = ChunkPipe::from(vec![1, 2, 3, 4, 5]);
    let first = pipe.pop_front();
    let second = pipe.pop_front();
    let last = pipe.pop_end();
    println!(
        "pops        = front {:?}, front {:?}, end {:?}; remaining {:?}",
        first,
        second,
        last,
        pipe.range()
    );

    let pipe = ChunkPipe::from(vec![1, 2, 3]);
    println!("chunk pop   = {:?}", pipe.pop_chunk_front());
    println!("after drain = {:?} (len {})", pipe.pop_front(), pipe.len());

    let pipe: ChunkPipe<u32> = ChunkPipe::new();
    for start in (0..40).step_by(10) {
        pipe.push((start..start + 10).collect());
    }
    let mut visited = Vec::new();
    pipe.range_values(|&v| {
        visited.push(v);
        v < 24
    });
    println!("visit until = {:?}", visited);

    let batches: Vec<usize> = pipe
        .range_chunk()
        .context("failed to start chunk stream")?
        .map(|batch| batch.len())
        .collect();
    println!("stream      = {} batches, sizes {:?}", batches.len(), batches);
    println!("stats       = {:?}", pipe.stats());

    Ok(())
}

fn run_stress(producers: usize, batches: usize, batch_len: usize, stream_batch: usize) -> Result<()> {
    ensure!(producers > 0, "need at least one producer");
    ensure!(batch_len > 0, "batch length must be > 0");

    let config = PipeConfig {
        batch_capacity: stream_batch,
        ..PipeConfig::default()
    };
    let pipe: ChunkPipe<u64> = ChunkPipe::with_config(config).context("invalid pipe configuration")?;
    let expected = producers * batches * batch_len;
    let keep_back = expected / 10;

    info!(producers, batches, batch_len, expected, "starting stress run");
    let started = Instant::now();

    let drained = thread::scope(|scope| {
        for producer in 0..producers {
            let pipe = &pipe;
            thread::Builder::new()
                .name(format!("producer-{}", producer))
                .spawn_scoped(scope, move || {
                    for batch in 0..batches {
                        let base = ((producer * batches + batch) * batch_len) as u64;
                        pipe.push((base..base + batch_len as u64).collect());
                    }
                    debug!(producer, "producer finished");
                })
                .context("failed to spawn producer")?;
        }

        // Drain all but the last tenth so the read-back has something to stream
        let consumer = thread::Builder::new()
            .name("consumer".to_string())
            .spawn_scoped(scope, || {
                let mut drained = 0usize;
                while drained < expected - keep_back {
                    match pipe.pop_chunk_front() {
                        Some(values) => drained += values.len(),
                        None => thread::sleep(Duration::from_micros(50)),
                    }
                }
                drained
            })
            .context("failed to spawn consumer")?;

        consumer
            .join()
            .map_err(|_| anyhow::anyhow!("consumer thread panicked"))
    })?;

    let elapsed = started.elapsed();
    let remaining: usize = pipe
        .range_chunk()
        .context("failed to start chunk stream")?
        .map(|batch| batch.len())
        .sum();

    ensure!(
        drained + remaining == expected,
        "lost values: drained {} + remaining {} != pushed {}",
        drained,
        remaining,
        expected
    );

    let rate = expected as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    println!(
        "pushed {} values, drained {}, streamed back {} in {:.2?} ({:.0} values/s)",
        expected, drained, remaining, elapsed, rate
    );
    println!("stats: {:?}", pipe.stats());

    Ok(())
}
