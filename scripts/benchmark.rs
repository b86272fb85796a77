// scripts/benchmark.rs
use quant_primer::analytics::bs_analytic::{OptionKind, OptionParameters};
use quant_primer::analytics::greeks::{greeks, Greek};
use quant_primer::analytics::heatmap::greek_heatmap;
use quant_primer::analytics::implied_vol::implied_volatility;
use quant_primer::math_utils::{linspace, Timer};
use quant_primer::mc::mc_engine::{mc_price_european, McConfig};
use quant_primer::pe::metrics::irr;
use quant_primer::risk::var::{conditional_var, historical_var};
use quant_primer::rng::normal_returns;
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::process::Command;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rust_version: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::get_cpu_model(),
            cpu_cores: num_cpus::get(),
            rust_version: Command::new("rustc")
                .arg("--version")
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown Rust version".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn get_cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(target_os = "macos")]
        {
            Command::new("sysctl")
                .args(["-n", "machdep.cpu.brand_string"])
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown CPU".to_string())
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            "Unknown CPU".to_string()
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    evaluations: usize,
    time_ms: f64,
    value: f64,
    reference: Option<f64>,
}

impl BenchmarkResult {
    fn throughput(&self) -> f64 {
        self.evaluations as f64 / (self.time_ms / 1000.0)
    }

    fn relative_error(&self) -> Option<f64> {
        self.reference.map(|r| (self.value - r).abs() / r.abs())
    }
}

fn base_params() -> OptionParameters {
    OptionParameters::new(100.0, 100.0, 1.0, 0.05, 0.2).expect("Valid parameters")
}

fn run_closed_form_benchmarks() -> Vec<BenchmarkResult> {
    let base = base_params();
    let n = 1_000_000;
    let strikes = linspace(50.0, 150.0, n);
    let mut results = Vec::new();

    let mut timer = Timer::new();
    timer.start();
    let total: f64 = strikes
        .iter()
        .map(|&strike| OptionParameters { strike, ..base }.price(OptionKind::Call))
        .sum();
    results.push(BenchmarkResult {
        name: "Black-Scholes call price".to_string(),
        evaluations: n,
        time_ms: timer.elapsed_ms(),
        value: total / n as f64,
        reference: None,
    });

    timer.start();
    let total: f64 = strikes
        .iter()
        .map(|&strike| greeks(OptionKind::Call, &OptionParameters { strike, ..base }).delta)
        .sum();
    results.push(BenchmarkResult {
        name: "Black-Scholes Greeks".to_string(),
        evaluations: n,
        time_ms: timer.elapsed_ms(),
        value: total / n as f64,
        reference: None,
    });

    let solves = 20_000;
    let targets: Vec<(OptionParameters, f64)> = linspace(80.0, 120.0, solves)
        .into_iter()
        .map(|strike| {
            let p = OptionParameters { strike, ..base };
            (p, p.price(OptionKind::Call))
        })
        .collect();
    timer.start();
    let worst = targets
        .iter()
        .map(|(p, price)| {
            implied_volatility(OptionKind::Call, *price, p)
                .map(|iv| (iv - base.volatility).abs())
                .unwrap_or(f64::INFINITY)
        })
        .fold(0.0, f64::max);
    results.push(BenchmarkResult {
        name: "Implied volatility solve".to_string(),
        evaluations: solves,
        time_ms: timer.elapsed_ms(),
        value: base.volatility + worst,
        reference: Some(base.volatility),
    });

    let spots = linspace(60.0, 140.0, 400);
    let vols = linspace(0.05, 0.80, 400);
    timer.start();
    let surface = greek_heatmap(OptionKind::Call, &base, Greek::Gamma, &spots, &vols).expect("Valid grid");
    results.push(BenchmarkResult {
        name: "Gamma heat map (parallel)".to_string(),
        evaluations: surface.len(),
        time_ms: timer.elapsed_ms(),
        value: surface.iter().copied().fold(0.0, f64::max),
        reference: None,
    });

    results
}

fn run_monte_carlo_benchmarks() -> Vec<BenchmarkResult> {
    let base = base_params();
    let analytic = base.price(OptionKind::Call);

    [10_000, 100_000, 1_000_000]
        .iter()
        .map(|&paths| {
            println!("Running Monte Carlo check with {} paths...", paths);
            let cfg = McConfig {
                paths,
                seed: 42,
                ..Default::default()
            };
            let mut timer = Timer::new();
            timer.start();
            let estimate = mc_price_european(OptionKind::Call, &base, &cfg).expect("Valid configuration");
            BenchmarkResult {
                name: format!("MC European call ({}k paths)", paths / 1000),
                evaluations: paths,
                time_ms: timer.elapsed_ms(),
                value: estimate.price,
                reference: Some(analytic),
            }
        })
        .collect()
}

fn run_risk_benchmarks() -> Vec<BenchmarkResult> {
    let n = 2_000_000;
    let returns = normal_returns(42, n, 0.0, 0.01).expect("Valid distribution");
    let mut results = Vec::new();

    let mut timer = Timer::new();
    timer.start();
    let var = historical_var(&returns, 1_000_000.0, 0.99).expect("Valid inputs");
    results.push(BenchmarkResult {
        name: "Historical VaR 99%".to_string(),
        evaluations: n,
        time_ms: timer.elapsed_ms(),
        value: var,
        // 2.326 · 1% · 1M
        reference: Some(23_263.5),
    });

    timer.start();
    let cvar = conditional_var(&returns, 1_000_000.0, 0.99).expect("Valid inputs");
    results.push(BenchmarkResult {
        name: "CVaR 99%".to_string(),
        evaluations: n,
        time_ms: timer.elapsed_ms(),
        value: cvar,
        reference: Some(26_652.1),
    });

    let solves = 10_000;
    timer.start();
    let mut last = 0.0;
    for i in 0..solves {
        let rate = 0.05 + 0.25 * i as f64 / solves as f64;
        let flows = [-100.0, 0.0, 0.0, 0.0, 100.0 * (1.0 + rate).powi(4)];
        last = irr(&flows).expect("Sign change bracketed");
    }
    results.push(BenchmarkResult {
        name: "IRR solve".to_string(),
        evaluations: solves,
        time_ms: timer.elapsed_ms(),
        value: last,
        reference: Some(0.05 + 0.25 * (solves - 1) as f64 / solves as f64),
    });

    results
}

fn format_option(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "N/A".to_string())
}

fn write_results_to_csv(results: &[BenchmarkResult], system_info: &SystemInfo, filename: &str) -> io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU: {}", system_info.cpu_model)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rust Version: {}", system_info.rust_version)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "Benchmark,Evaluations,Time_ms,Throughput_per_sec,Value,Reference,Relative_Error")?;

    for result in results {
        writeln!(
            file,
            "{},{},{:.2},{:.0},{:.6},{},{}",
            result.name,
            result.evaluations,
            result.time_ms,
            result.throughput(),
            result.value,
            format_option(result.reference, |v| format!("{:.6}", v)),
            format_option(result.relative_error(), |e| format!("{:.6}", e)),
        )?;
    }
    Ok(())
}

fn main() -> io::Result<()> {
    println!("quant-primer Benchmark Suite");
    println!("============================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rust Version: {}", system_info.rust_version);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let mut all_results = run_closed_form_benchmarks();
    all_results.extend(run_monte_carlo_benchmarks());
    all_results.extend(run_risk_benchmarks());

    println!("\n{:=<96}", "");
    println!(
        "{:<34} {:>10} {:>11} {:>14} {:>12} {:>12}",
        "Benchmark", "Evals", "Time (ms)", "Throughput/s", "Value", "Rel Error"
    );
    println!("{:-<96}", "");
    for result in &all_results {
        println!(
            "{:<34} {:>10} {:>11.2} {:>14.0} {:>12.6} {:>12}",
            result.name,
            result.evaluations,
            result.time_ms,
            result.throughput(),
            result.value,
            format_option(result.relative_error(), |e| format!("{:.4}%", e * 100.0)),
        );
    }
    println!("{:=<96}", "");

    let filename = format!("benchmark_results_{}.csv", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
    write_results_to_csv(&all_results, &system_info, &filename)?;
    println!("\nResults saved to: {}", filename);
    println!("Run with: cargo run --bin benchmark --release");
    Ok(())
}
