use parallel_ntt::io::{read_polynomial_from_file, write_polynomial_to_file};
use parallel_ntt::math::finite_field::FiniteField;
use parallel_ntt::{multiply, Convention, Fr, Mode, Result};
use std::{
    env,
    io::{self, Write},
    process,
    time::{Duration, Instant},
};

const INPUT_A: &str = "data/input_a.bin";
const INPUT_B: &str = "data/input_b.bin";
const OUTPUT_C: &str = "data/output_c.bin";

#[derive(Default)]
struct Options {
    multicore: bool,
    test_mode: bool,
    debug_mode: bool,
}

fn usage() -> ! {
    let program = env::args().next().unwrap_or_else(|| "polymul".to_string());
    eprintln!("Usage: {program} [-m|--multicore] [-t|--test] [-d|--debug]");
    process::exit(1);
}

fn parse_arguments() -> Options {
    let mut options = Options::default();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--multicore" => options.multicore = true,
            "--test" => options.test_mode = true,
            "--debug" => options.debug_mode = true,
            short if short.starts_with('-') && short.len() > 1 && !short.starts_with("--") => {
                // combined short flags, e.g. -mt
                for flag in short.chars().skip(1) {
                    match flag {
                        'm' => options.multicore = true,
                        't' => options.test_mode = true,
                        'd' => options.debug_mode = true,
                        _ => usage(),
                    }
                }
            }
            _ => usage(),
        }
    }
    options
}

fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    format!("({}m {}s {}ms)", ms / 60000, (ms % 60000) / 1000, ms % 1000)
}

/// Runs `f`, printing a progress line and its wall-clock time.
fn timed<T>(running: &str, done: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    print!("[*] {running}");
    if let Err(e) = io::stdout().flush() {
        eprintln!("[-] Unable to flush stdout: {e}");
    }
    let start = Instant::now();
    let res = f();
    match &res {
        Ok(_) => println!("\r[+] {done:<50} {}", format_duration(start.elapsed())),
        Err(e) => println!("\r[-] {running}: {e}"),
    }
    res
}

fn print_polynomial(poly: &[Fr]) {
    let line = "-".repeat(150);
    println!("[i] Polynomial Info");
    println!("\t{line}");
    for (i, c) in poly.iter().enumerate() {
        println!("\t{i} : 0x{c:x} ({c})");
    }
    println!("\t{line}");
}

fn main() {
    let options = parse_arguments();

    let mode = if options.multicore {
        Mode::parallel_from_available()
    } else {
        Mode::Serial
    };
    match mode {
        Mode::Serial => println!("[i] Mode : Serial"),
        Mode::Parallel { log_cpus } => {
            let num_cpus = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            println!("[i] Mode : Parallel");
            println!("\t- num_cpus : {num_cpus}");
            println!("\t- log_cpus : {log_cpus}");
        }
    }

    let (a, b) = if options.test_mode {
        (
            vec![Fr::from(1), Fr::from(2)],
            vec![Fr::from(3), Fr::from(5)],
        )
    } else {
        let read = |path: &str| {
            timed(&format!("Reading {path}"), &format!("Read {path}"), || {
                read_polynomial_from_file::<Fr>(path)
            })
        };
        let a = read(INPUT_A).unwrap_or_else(|_| process::exit(1));
        let b = read(INPUT_B).unwrap_or_else(|_| process::exit(1));
        (a, b)
    };

    let convention = Convention::NegativeWrapped;
    let n = convention.domain_size(a.len(), b.len());
    let psi = match Fr::get_primitive_root_of_unity(2 * n) {
        Ok(psi) => psi,
        Err(e) => {
            eprintln!("[-] {e}");
            process::exit(1);
        }
    };
    let omega = psi * psi;
    println!("[i] NTT Parameter");
    println!("\t - Polynomial Size : {n}");
    println!("\t - Omega : 0x{omega:x}");
    if let Ok(omega_inv) = omega.inv() {
        println!("\t - O_inv : 0x{omega_inv:x}");
    }

    let label = match mode {
        Mode::Serial => "Serial",
        Mode::Parallel { .. } => "Parallel",
    };
    let c = match timed(
        &format!("processing {label} NTT"),
        &format!("{label} NTT process complete"),
        || multiply(&a, &b, mode, convention),
    ) {
        Ok(c) => c,
        Err(_) => process::exit(1),
    };

    if !options.test_mode
        && timed(&format!("Writing {OUTPUT_C}"), &format!("Written {OUTPUT_C}"), || {
            write_polynomial_to_file(OUTPUT_C, &c)
        })
        .is_err()
    {
        process::exit(1);
    }

    if options.test_mode || options.debug_mode {
        print_polynomial(&a);
        print_polynomial(&b);
        print_polynomial(&c);
    }
}
