use std::io::Write;
use std::path::Path;
use parhist_common::{ParhistError, Result};
use crate::histogram::Histogram;
use crate::orchestrator::{HistogramRun, TopologyComparison};

// --- plain text, one line of bin maxes and one of counts ---

pub fn write_histogram<W: Write>(out: &mut W, histogram: &Histogram) -> std::io::Result<()> {
    let maxes: Vec<String> = histogram.bins().iter().map(|b| b.upper_bound.to_string()).collect();
    let counts: Vec<String> = histogram.bins().iter().map(|b| b.count.to_string()).collect();
    writeln!(out, "Bin maxes: {}", maxes.join(" "))?;
    writeln!(out, "Bin counts: {}", counts.join(" "))?;
    Ok(())
}

pub fn print_histogram(histogram: &Histogram) -> Result<()> {
    let stdout = std::io::stdout();
    write_histogram(&mut stdout.lock(), histogram)?;
    Ok(())
}

pub fn print_run_summary(run: &HistogramRun) {
    println!("{:<12} {}", "Topology:", run.topology);
    println!("{:<12} {}", "Workers:", run.workers);
    println!("{:<12} {}", "Values:", run.value_count);
    println!("{:<12} {:.3} ms", "Elapsed:", run.elapsed_ms);
}

pub fn print_comparison(cmp: &TopologyComparison) {
    println!("{:<14} {:.3} ms", "shared:", cmp.shared.elapsed_ms);
    println!("{:<14} {:.3} ms", "distributed:", cmp.distributed.elapsed_ms);
    println!("{:<14} {}", "identical:", if cmp.identical { "yes" } else { "NO" });
}

// --- JSON export ---

pub fn export_json(output_path: &Path, run: &HistogramRun) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, run).map_err(|e| ParhistError::Other(e.to_string()))?;
    writeln!(file)?;
    Ok(())
}

// --- CSV export ---

pub fn write_csv<W: Write>(out: &mut W, histogram: &Histogram) -> std::io::Result<()> {
    let layout = histogram.layout();
    writeln!(out, "bin,lower_bound,upper_bound,count")?;
    for (i, bin) in histogram.bins().iter().enumerate() {
        let lower = if i == 0 { layout.min() } else { layout.upper_bound(i - 1) };
        writeln!(out, "{},{},{},{}", i, lower, bin.upper_bound, bin.count)?;
    }
    Ok(())
}

pub fn export_csv(output_path: &Path, histogram: &Histogram) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    write_csv(&mut file, histogram)?;
    Ok(())
}
