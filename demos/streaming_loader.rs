//! Bulk writer feeding a row-wise reader through a chunk pipe.

use std::sync::Arc;
use std::thread;

use chunkpipe::ChunkPipe;

#[derive(Debug, Clone)]
struct Row {
    id: u32,
    value: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let pipe = Arc::new(ChunkPipe::<Row>::new());

    // Writer hands over whole pages of rows; nothing is copied on push.
    let writer = {
        let pipe = Arc::clone(&pipe);
        thread::spawn(move || {
            for page in 0..20u32 {
                let rows = (0..500)
                    .map(|i| Row {
                        id: page * 500 + i,
                        value: f64::from(i) * 0.5,
                    })
                    .collect();
                pipe.push(rows);
            }
        })
    };
    writer
        .join()
        .map_err(|_| anyhow::anyhow!("writer thread panicked"))?;

    // Row-wise peek at the newest row, then stream the rest in batches.
    if let Some(last) = pipe.pop_end() {
        println!("newest row: {:?}", last);
    }

    let mut rows = 0usize;
    let mut total = 0.0;
    for batch in pipe.range_chunk()? {
        rows += batch.len();
        total += batch.iter().map(|row| row.value).sum::<f64>();
    }
    println!("streamed {} rows, value sum {:.1}", rows, total);

    let mut first_ids = Vec::new();
    pipe.range_values(|row| {
        first_ids.push(row.id);
        first_ids.len() < 5
    });
    println!("first ids: {:?}", first_ids);
    println!("stats: {:?}", pipe.stats());

    Ok(())
}
