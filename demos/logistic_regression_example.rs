use lfdkit::{DataGenerator, Interval, LogisticRegression, OUT_OF_SAMPLE_POINTS};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    println!("=== Logistic Regression with SGD ===\n");

    let runs = 100;
    let mut total_epochs = 0;
    let mut total_eout = 0.0;

    for run in 0..runs {
        let mut rng = StdRng::seed_from_u64(run);
        let generator = DataGenerator::random_line(Interval::default(), &mut rng);
        let training = generator.sample(100, &mut rng)?;

        let mut model = LogisticRegression::new(training)
            .learning_rate(0.01)
            .tolerance(0.01)
            .random_state(run);
        total_epochs += model.learn()?;
        total_eout += model.out_of_sample_error(&generator, OUT_OF_SAMPLE_POINTS)?;
    }

    println!("Runs: {}", runs);
    println!("Average epochs: {:.1}", total_epochs as f64 / runs as f64);
    println!("Average Eout (cross-entropy): {:.4}", total_eout / runs as f64);

    Ok(())
}
