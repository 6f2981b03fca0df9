use std::env;
use std::error::Error;
use std::path::Path;

use log::{info, warn};

use evo_drive::simulation::brain::Brain;
use evo_drive::simulation::params::Params;
use evo_drive::simulation::population::Population;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = match env::args().nth(1) {
        Some(path) => {
            info!("loading parameters from {}", path);
            Params::load_from_file(&path)?
        }
        None => Params::default(),
    };

    let seed = match params.brain_path.as_deref() {
        Some(path) if Path::new(path).exists() => {
            info!("seeding the first generation from {}", path);
            Some(Brain::load_from_file(path)?)
        }
        _ => None,
    };

    let mut population = Population::with_seed_brain(params.clone(), seed)?;
    let mut best: Option<(f32, Brain)> = None;

    for _ in 0..params.generations {
        let Some(summary) = population.run_generation(params.max_generation_ticks) else {
            warn!("generation {} could not be bred, stopping", population.generation());
            break;
        };
        let improved = best
            .as_ref()
            .is_none_or(|(fitness, _)| summary.best_fitness > *fitness);
        if improved {
            best = Some((summary.best_fitness, summary.champion));
        }
    }

    let Some((fitness, brain)) = best else {
        warn!("no generation finished, nothing to save");
        return Ok(());
    };

    let path = params.brain_path.clone().unwrap_or_else(|| {
        format!(
            "best_brain_{}.json",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        )
    });
    brain.save_to_file(&path)?;
    info!("saved best brain (fitness {:.1}) to {}", fitness, path);

    if let Some(record) = population.history().latest() {
        info!(
            "last generation: best fitness {:.1}, mean {:.1}",
            record.best_fitness, record.mean_fitness
        );
    }

    Ok(())
}
