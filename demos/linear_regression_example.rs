use std::env;

use lfdkit::preprocessing::{nonlinear, quadratic};
use lfdkit::{DataGenerator, Dataset, Interval, LinearRegression, TargetFunction};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    println!("=== Linear Regression for Classification ===\n");

    let mut rng = StdRng::seed_from_u64(2014);
    let interval = Interval::default();

    // Linear target, no noise
    let generator = DataGenerator::random_line(interval, &mut rng);
    let mut model = LinearRegression::new(generator.sample(100, &mut rng)?).random_state(1);
    model.learn()?;
    println!("Linear target, N = 100");
    println!("  weights: {}", model.weights);
    println!("  Ein  = {:.3}", model.in_sample_error()?);
    println!("  Eout = {:.3}\n", model.out_of_sample_error(&generator, 1000)?);

    // Circle target with 10% noise, quadratic features
    let circle = TargetFunction::decision(|x1, x2| x1 * x1 + x2 * x2 - 0.6);
    let generator = DataGenerator::new(interval, circle.clone()).noise(0.1)?;
    let mut model = LinearRegression::new(generator.sample(1000, &mut rng)?).random_state(2);
    println!("Circle target, 10% noise, N = 1000");
    model.learn()?;
    println!("  raw features:       Ein = {:.3}", model.in_sample_error()?);
    model.apply_transformation(quadratic())?;
    model.learn()?;
    println!("  quadratic features: Ein = {:.3}", model.in_sample_error()?);
    println!("  weights: {}", model.weights);
    let disagreement_in = model.compare_in_sample(&circle)?;
    let disagreement_out = model.compare_out_of_sample(&circle, &interval, 1000)?;
    println!(
        "  disagreement with target: in {:.3}, out {:.3}",
        disagreement_in, disagreement_out
    );
    println!("  Eout = {:.3}\n", model.out_of_sample_error(&generator, 1000)?);

    // Optional data files: `in.dta` and `out.dta` paths as arguments
    let args: Vec<String> = env::args().collect();
    if let [_, train_path, test_path] = args.as_slice() {
        let data = Dataset::from_file(train_path)?;
        let test = Dataset::from_file(test_path)?;

        println!("Weight decay on {} ({} samples)", train_path, data.n_samples());
        let mut model = LinearRegression::new(data.clone());
        model.apply_transformation(nonlinear(7)?)?;
        model.learn()?;
        println!(
            "  no decay: Ein = {:.3}, Eout = {:.3}",
            model.in_sample_error()?,
            model.error_on(&test)?
        );
        for k in -3..=3 {
            model.learn_with_weight_decay(k)?;
            println!(
                "  k = {:>2}: Ein = {:.3}, Eout = {:.3}",
                k,
                model.augmented_in_sample_error()?,
                model.augmented_error_on(&test)?
            );
        }

        if data.n_samples() > 25 {
            println!("\nValidation (first 25 train, rest validate)");
            let (training, validation) = data.split_at(25)?;
            for k in 3..=7 {
                let mut model = LinearRegression::new(training.clone()).validation(validation.clone())?;
                model.apply_transformation(nonlinear(k)?)?;
                model.learn()?;
                println!(
                    "  k = {}: Eval = {:.3}, Eout = {:.3}",
                    k,
                    model.validation_error()?,
                    model.error_on(&test)?
                );
            }
        }
    }

    Ok(())
}
