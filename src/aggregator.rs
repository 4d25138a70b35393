use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{self, RawRecord};
use crate::series::{self, SeriesStats};

/// Number of trials each configuration is expected to run.
pub const DEFAULT_TRIALS: usize = 5;

pub fn process_file(path: &Path, trials: usize) -> Result<SpeedupReport> {
    let file = File::open(path)?;
    let mut aggregator = SpeedupAggregator::with_trials(trials)?;
    aggregator.process(io::BufReader::new(file))?;
    Ok(aggregator.compute_speedups())
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct ParallelSeries {
    stats: SeriesStats,
    speedup: Option<f64>,
}

impl ParallelSeries {
    pub fn stats(&self) -> &SeriesStats {
        &self.stats
    }

    /// Set by [`SpeedupAggregator::compute_speedups`] when both averages are frozen.
    pub fn speedup(&self) -> Option<f64> {
        self.speedup
    }
}

pub struct SpeedupAggregator {
    trials: usize,
    seq: HashMap<String, SeriesStats>,
    par: HashMap<String, BTreeMap<u32, ParallelSeries>>,
    // parallel sizes in first-appearance order
    par_order: Vec<String>,
}

impl SpeedupAggregator {
    pub fn new() -> Self {
        SpeedupAggregator {
            trials: DEFAULT_TRIALS,
            seq: HashMap::new(),
            par: HashMap::new(),
            par_order: Vec::new(),
        }
    }

    pub fn with_trials(trials: usize) -> Result<Self> {
        if trials == 0 {
            return Err(Error::InvalidTrials);
        }
        Ok(SpeedupAggregator {
            trials,
            ..Self::new()
        })
    }

    /// Consumes every line of `reader`. The first malformed line aborts the run.
    pub fn process<R: BufRead>(&mut self, reader: R) -> Result<&mut Self> {
        let mut records = 0_usize;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.add(record::parse(idx + 1, line)?);
            records += 1;
        }
        info!(
            "read {} records: {} sequential sizes, {} parallel sizes",
            records,
            self.seq.len(),
            self.par.len()
        );
        Ok(self)
    }

    pub fn add(&mut self, record: RawRecord) {
        let trials = self.trials;
        match record {
            RawRecord::Sequential { size, time } => {
                self.seq.entry(size).or_default().add(time, trials);
            }
            RawRecord::Parallel {
                size,
                threads,
                time,
            } => {
                let by_threads = match self.par.entry(size) {
                    Entry::Occupied(e) => e.into_mut(),
                    Entry::Vacant(e) => {
                        self.par_order.push(e.key().clone());
                        e.insert(BTreeMap::new())
                    }
                };
                by_threads
                    .entry(threads)
                    .or_default()
                    .stats
                    .add(time, trials);
            }
        }
    }

    pub fn sequential(&self, size: &str) -> Option<&SeriesStats> {
        self.seq.get(size)
    }

    pub fn parallel(&self, size: &str, threads: u32) -> Option<&ParallelSeries> {
        self.par.get(size).and_then(|by_threads| by_threads.get(&threads))
    }

    /// Second pass over the parallel table. Must run after all records have been added,
    /// otherwise averages that are not yet frozen would be treated as incomplete.
    pub fn compute_speedups(&mut self) -> SpeedupReport {
        let mut report = SpeedupReport::default();

        for size in &self.par_order {
            let by_threads = match self.par.get_mut(size) {
                Some(by_threads) => by_threads,
                None => continue,
            };

            let baseline = match self.seq.get(size) {
                Some(stats) => stats,
                None => {
                    debug!("size {}: no sequential baseline, skipping", size);
                    report.skip(size, None, SkipReason::MissingBaseline);
                    continue;
                }
            };
            let seq_avg = match baseline.average() {
                Some(avg) => avg,
                None => {
                    warn!(
                        "size {}: sequential series has {} of {} samples, skipping",
                        size,
                        baseline.count(),
                        self.trials
                    );
                    report.skip(size, None, SkipReason::IncompleteSeries);
                    continue;
                }
            };

            let mut points = Vec::with_capacity(by_threads.len());
            for (&threads, series) in by_threads.iter_mut() {
                match series.stats.average() {
                    None => {
                        warn!(
                            "size {}, {} threads: parallel series has {} of {} samples, skipping",
                            size,
                            threads,
                            series.stats.count(),
                            self.trials
                        );
                        report.skip(size, Some(threads), SkipReason::IncompleteSeries);
                    }
                    Some(par_avg) if par_avg == 0.0 => {
                        warn!("size {}, {} threads: average time is zero, skipping", size, threads);
                        report.skip(size, Some(threads), SkipReason::ZeroAverage);
                    }
                    Some(par_avg) => {
                        let speedup = series::round(seq_avg / par_avg);
                        series.speedup = Some(speedup);
                        points.push(SpeedupPoint { threads, speedup });
                    }
                }
            }

            if !points.is_empty() {
                report.sizes.push(SizeSpeedups {
                    size: size.clone(),
                    points,
                });
            }
        }

        self.dump_tables();
        report
    }

    fn dump_tables(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        let mut sizes: Vec<_> = self.seq.keys().collect();
        sizes.sort_unstable();
        for size in sizes {
            let stats = &self.seq[size];
            debug!("seq {}: times={:?} average={:?}", size, stats.times(), stats.average());
        }
        for size in &self.par_order {
            for (threads, series) in &self.par[size] {
                debug!(
                    "par {} x{}: times={:?} average={:?} speedup={:?}",
                    size,
                    threads,
                    series.stats.times(),
                    series.stats.average(),
                    series.speedup
                );
            }
        }
    }
}

impl Default for SpeedupAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct SpeedupPoint {
    pub threads: u32,
    pub speedup: f64,
}

/// All computed speedups for one size, in ascending thread order.
#[derive(PartialEq, Debug, Clone)]
pub struct SizeSpeedups {
    pub size: String,
    pub points: Vec<SpeedupPoint>,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum SkipReason {
    /// Fewer samples than the trial count by end of input.
    IncompleteSeries,
    /// Parallel data for a size that has no sequential runs.
    MissingBaseline,
    ZeroAverage,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Skipped {
    pub size: String,
    /// `None` when the whole size was dropped.
    pub threads: Option<u32>,
    pub reason: SkipReason,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct SpeedupReport {
    sizes: Vec<SizeSpeedups>,
    skipped: Vec<Skipped>,
}

impl SpeedupReport {
    /// Sizes in first-appearance order.
    pub fn sizes(&self) -> &[SizeSpeedups] {
        &self.sizes
    }

    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn speedup(&self, size: &str, threads: u32) -> Option<f64> {
        self.sizes
            .iter()
            .find(|s| s.size == size)
            .and_then(|s| s.points.iter().find(|p| p.threads == threads))
            .map(|p| p.speedup)
    }

    fn skip(&mut self, size: &str, threads: Option<u32>, reason: SkipReason) {
        self.skipped.push(Skipped {
            size: size.to_owned(),
            threads,
            reason,
        });
    }

    /// Writes `{size=[threads:speedup, ...], ...}` followed by a newline.
    pub fn write(&self, output: &mut dyn Write) -> io::Result<()> {
        output.write_all(b"{")?;
        let mut first = true;
        for entry in &self.sizes {
            if !first {
                output.write_all(b", ")?;
            } else {
                first = false
            }
            write!(output, "{}=[", entry.size)?;
            for (i, point) in entry.points.iter().enumerate() {
                if i > 0 {
                    output.write_all(b", ")?;
                }
                write!(output, "{}:{:.2}", point.threads, point.speedup)?;
            }
            output.write_all(b"]")?;
        }
        output.write_all(b"}\n")?;
        Ok(())
    }
}
