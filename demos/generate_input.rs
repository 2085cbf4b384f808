use parallel_ntt::io::{generate_random_polynomial, write_polynomial_to_file};
use parallel_ntt::Fr;
use std::{
    env, fs,
    io::{self, Write},
    process,
    time::Instant,
};

const OUTPUTS: [&str; 2] = ["data/input_a.bin", "data/input_b.bin"];

fn usage() -> ! {
    eprintln!("Usage: generate_input [-n k]");
    process::exit(1);
}

/// Writes 2^k random BLS12-381 scalars to each input file (k = 4 by default).
fn main() {
    let args = env::args().skip(1).collect::<Vec<String>>();
    let k: u32 = match args.as_slice() {
        [] => 4,
        [flag, k] if flag == "-n" => k.parse().unwrap_or_else(|_| usage()),
        _ => usage(),
    };
    if k >= usize::BITS {
        usage();
    }
    let degree = 1usize << k;

    println!("Generating data with degree: 2^{k} ({degree} elements)");
    if let Err(e) = fs::create_dir_all("data") {
        eprintln!("[-] Unable to create data directory: {e}");
        process::exit(1);
    }

    let mut rng = rand::thread_rng();
    for filename in OUTPUTS {
        print!("[*] Generating {filename}...");
        if let Err(e) = io::stdout().flush() {
            eprintln!("[-] Unable to flush stdout: {e}");
        }

        let start = Instant::now();
        let poly: Vec<Fr> = generate_random_polynomial(&mut rng, degree);
        match write_polynomial_to_file(filename, &poly) {
            Ok(()) => {
                let ms = start.elapsed().as_millis();
                println!(
                    "\r[+] Polynomial written to {filename:<30} ({}m {}s {}ms)",
                    ms / 60000,
                    (ms % 60000) / 1000,
                    ms % 1000
                );
            }
            Err(e) => {
                eprintln!("\r[-] Unable to write {filename}: {e}");
                process::exit(1);
            }
        }
    }
}
