//! Write sample yearly extracts (`ventas_2020.csv` … `ventas_2025.csv`).
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (default `data`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

const FIRST_YEAR: i32 = 2020;
const LAST_YEAR: i32 = 2025;
const N_CLIENTS: usize = 120;
const EXCLUDED_CLIENT: i64 = 12334;

const NAME_STEMS: [&str; 12] = [
    "Aluminios", "Cerrajería", "Vidrios", "Perfiles", "Carpintería", "Reformas",
    "Cristalería", "Fachadas", "Metalúrgica", "Ventanas", "Toldos", "Estructuras",
];
const NAME_SUFFIXES: [&str; 6] = ["Norte", "Sur", "Levante", "Hermanos", "Martín", "Costa"];

#[derive(Serialize)]
struct Row<'a> {
    client_code: String,
    client_code_norm: i64,
    client_name: &'a str,
    net_sales: f64,
}

/// Deterministic PRNG (splitmix64), enough for sample data.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

struct Client {
    code_norm: i64,
    name: String,
    /// Typical yearly spend.
    base: f64,
}

fn build_clients(rng: &mut SampleRng) -> Vec<Client> {
    let mut clients: Vec<Client> = (0..N_CLIENTS)
        .map(|i| {
            let stem = NAME_STEMS[i % NAME_STEMS.len()];
            let suffix = NAME_SUFFIXES[(i / NAME_STEMS.len()) % NAME_SUFFIXES.len()];
            // Long-tailed spend: most clients small, a few large.
            let base = 2_000.0 + 40_000.0 * rng.next_f64().powi(3);
            Client {
                code_norm: 10_000 + (i as i64) * 7,
                name: format!("{stem} {suffix} S.L."),
                base,
            }
        })
        .collect();

    // Two distinct clients sharing one display name.
    let twin = clients[0].name.clone();
    clients[N_CLIENTS - 1].name = twin;

    clients.push(Client {
        code_norm: EXCLUDED_CLIENT,
        name: "Soleco Traders".to_string(),
        base: 80_000.0,
    });
    clients
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SampleRng(42);
    let clients = build_clients(&mut rng);

    for year in FIRST_YEAR..=LAST_YEAR {
        let path = out_dir.join(format!("ventas_{year}.csv"));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;

        let growth = 1.0 + 0.04 * (year - FIRST_YEAR) as f64;
        let mut rows = 0usize;
        for client in &clients {
            // Roughly one client in ten skips a given year.
            if rng.next_f64() < 0.1 {
                continue;
            }
            let noise = 0.7 + 0.6 * rng.next_f64();
            let net_sales = (client.base * growth * noise * 100.0).round() / 100.0;
            writer.serialize(Row {
                client_code: format!("C{:05}", client.code_norm),
                client_code_norm: client.code_norm,
                client_name: &client.name,
                net_sales,
            })?;
            rows += 1;
        }
        writer.flush()?;
        println!("Wrote {rows} rows to {}", path.display());
    }

    Ok(())
}
