use std::thread;

use lfdkit::{DataGenerator, Interval, OUT_OF_SAMPLE_POINTS, Perceptron};
use rand::SeedableRng;
use rand::rngs::StdRng;

const RUNS: u64 = 1000;

/// One independent trial: its own generator, target and perceptron.
fn trial(seed: u64, n_samples: usize) -> lfdkit::Result<(usize, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let generator = DataGenerator::random_line(Interval::default(), &mut rng);
    let training = generator.sample(n_samples, &mut rng)?;

    let mut pla = Perceptron::new(training).random_state(seed);
    let iterations = pla.converge()?;
    let disagreement = pla.disagreement(&generator, OUT_OF_SAMPLE_POINTS)?;
    Ok((iterations, disagreement))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    println!("=== Perceptron Learning Algorithm ===\n");

    let workers = thread::available_parallelism().map(|n| n.get() as u64).unwrap_or(1);

    for n_samples in [10, 100] {
        let results = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    scope.spawn(move || {
                        (worker..RUNS)
                            .step_by(workers as usize)
                            .map(|run| trial(run, n_samples))
                            .collect::<lfdkit::Result<Vec<_>>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().expect("trial thread panicked"))
                .collect::<lfdkit::Result<Vec<_>>>()
        })?;

        let trials: Vec<(usize, f64)> = results.into_iter().flatten().collect();
        let mean_iterations =
            trials.iter().map(|(i, _)| *i as f64).sum::<f64>() / trials.len() as f64;
        let mean_disagreement = trials.iter().map(|(_, d)| d).sum::<f64>() / trials.len() as f64;

        println!("N = {}", n_samples);
        println!("  average iterations to converge: {:.2}", mean_iterations);
        println!("  average P[f(x) != g(x)]:        {:.4}", mean_disagreement);
    }

    Ok(())
}
