// Pitch-class set theory engine: CLI entry point.
//
// Walks through the engine's three main workflows and prints the results:
// - pcsets: classify a few pcsets, list subset-classes, transform
// - invariance: random twelve-tone row, its intervals, imbrications,
//   hexachords, and T/I invariance matrices
// - complex: K and Kh about a nexus set-class
//
// Usage:
//   cargo run -p pctheory -- [pcsets|invariance|complex|all] [--seed N]
//     [--nexus NAME] [--config FILE]
//
// The nexus defaults to 6-Z17 and may be a Forte name or a bracketed prime
// form such as [012478].

use pctheory::config::EngineConfig;
use pctheory::invariance::{InvarianceMatrix, MatrixKind};
use pctheory::pcseg::PcSeg;
use pctheory::pcset::PitchClassSet;
use pctheory::pitch::PitchClass;
use pctheory::set_complex::SetComplex;
use pctheory::setclass::SetClass;
use pctheory::transformations::TransformationGroup;
use pctheory::{PcError, Result};
use pctheory_prng::Xoshiro256;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let command = args.get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("all");
    let seed: Option<u64> = parse_flag(&args, "--seed");
    let nexus_name: String = parse_flag(&args, "--nexus").unwrap_or_else(|| "6-Z17".to_string());
    let config_path: Option<String> = parse_flag(&args, "--config");

    let config = match config_path {
        Some(path) => match load_config(Path::new(&path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let seed = seed.unwrap_or_else(clock_seed);
    let mut rng = Xoshiro256::new(seed);

    let result = match command {
        "pcsets" => run_pcsets(&config),
        "invariance" => run_invariance(&config, seed, &mut rng),
        "complex" => run_complex(&config, &nexus_name),
        "all" => run_pcsets(&config)
            .and_then(|()| run_invariance(&config, seed, &mut rng))
            .and_then(|()| run_complex(&config, &nexus_name)),
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Expected one of: pcsets, invariance, complex, all");
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_pcsets(config: &EngineConfig) -> Result<()> {
    println!("=== Pcsets ===");
    let tto = TransformationGroup::full();

    let pcset1 = PitchClassSet::from_values(&[5, 8, 1, 0]);
    let pcset2 = PitchClassSet::from_values(&[4, 3, 9, 6, 2]);
    let pcset3 = PitchClassSet::from_values(&[10, 1, 5, 6, 11, 4]);

    let sc1 = SetClass::with_group(pcset1, config.group)?;
    let sc2 = SetClass::with_group(pcset2, config.group)?;
    let sc3 = SetClass::with_group(pcset3, config.group)?;
    println!("Set-classes:");
    for sc in [&sc1, &sc2, &sc3] {
        println!("  {:<12} {:<8} {:<8} {}", sc.name_prime(), sc.name_forte(), sc.name_carter(), sc.name_morris());
    }

    println!();
    println!("ic vectors:");
    for sc in [&sc1, &sc2, &sc3] {
        println!("  {}", sc.ic_vector_string());
    }

    let subsets = sc3.abstract_subset_classes()?;
    println!();
    println!("Abstract subset-classes of {} ({}):", sc3.name_prime(), subsets.len());
    for sc in &subsets {
        println!("  Prime form: {}", sc.name_prime());
    }

    let pcset4 = pcset1.union(pcset3);
    let sc4 = SetClass::with_group(pcset4, config.group)?;
    println!();
    println!("Union of two pcsets:");
    println!("  Prime form: {}", sc4.name_prime());
    println!("  ic vector: {}", sc4.ic_vector_string());

    println!();
    println!("Some transformations:");
    println!("  T5({}) = {}", pcset2, tto.get("T5")?.transform(&pcset2));
    println!("  T8I({}) = {}", sc3.pcset(), tto.get("T8I")?.transform(&sc3.pcset()));
    println!("  T1({}) = {}", pcset4, tto.get("T1")?.transform(&pcset4));
    println!("  T11I({}) = {}", pcset1, tto.get("T11I")?.transform(&pcset1));
    println!("  T3M({}) = {}", pcset1, tto.get("T3M")?.transform(&pcset1));
    println!();
    Ok(())
}

fn run_invariance(config: &EngineConfig, seed: u64, rng: &mut Xoshiro256) -> Result<()> {
    println!("=== Invariance matrices ===");
    println!("Seed: {}", seed);
    let ro = TransformationGroup::ordered();
    let pc6 = PitchClass::new(6);

    let row = PcSeg::generate_random(12, true, PitchClass::new(0), rng);
    println!("Row: {}", row);
    println!("Intervals: {:?}", row.intervals());
    let trichords: Vec<String> = row
        .imbricate_with(3, config.imbrication)
        .iter()
        .map(|w| w.to_string())
        .collect();
    println!("Imbricated trichords: {}", trichords.join(" "));
    let (first, second) = row.split_at(6);
    let hexachords = [
        SetClass::with_group(first.to_pcset(), config.group)?,
        SetClass::with_group(second.to_pcset(), config.group)?,
    ];
    println!("Hexachords: {}, {}", hexachords[0].name_morris(), hexachords[1].name_morris());

    let t_matrix = InvarianceMatrix::new(MatrixKind::T, &row, &row)?;
    let i_matrix = InvarianceMatrix::new(MatrixKind::I, &row, &row)?;

    println!();
    print!("{}", t_matrix);

    println!();
    println!("Invariance matrix type: 'T'");
    print!("{}", t_matrix.render_operator_index(&[pc6]));
    println!("Row: {}", row);
    println!("T6:  {}", ro.get("T6")?.transform(&row));

    println!();
    println!("Invariance matrix type: 'I'");
    print!("{}", i_matrix.render_operator_index(&[pc6]));
    println!("Row: {}", row);
    println!("T6I: {}", ro.get("T6I")?.transform(&row));
    println!();
    Ok(())
}

fn run_complex(config: &EngineConfig, nexus_name: &str) -> Result<()> {
    println!("=== Set complexes ===");
    let nexus = SetClass::load_from_name_in(nexus_name, config.group)?;

    let trichords: Vec<SetClass> = nexus
        .abstract_subset_classes()?
        .into_iter()
        .filter(|sc| sc.len() == 3)
        .collect();
    let names: Vec<String> = trichords.iter().map(|sc| sc.name_prime()).collect();
    println!(
        "There are {} trichordal subset-classes in {}. There are 12 trichordal subset-classes total.",
        trichords.len(),
        nexus.name_forte()
    );
    println!("  {}", names.join(" "));

    let k = SetComplex::k_with(&nexus, config)?;
    let kh = SetComplex::kh_with(&nexus, config)?;

    println!();
    println!("Set-complex K about nexus set {} ({} classes):", nexus.name_morris(), k.len());
    for sc in &k {
        println!("  {}", sc.name_morris());
    }
    println!();
    println!("Set-complex Kh about nexus set {} ({} classes):", nexus.name_morris(), kh.len());
    for sc in &kh {
        println!("  {}", sc.name_morris());
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| PcError::Config(e.to_string()))?;
    EngineConfig::from_json(&text)
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
