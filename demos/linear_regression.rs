//! Standalone linear regression demo.
//!
//! Fits `y = w * x + b` to a five-point dataset with plain stochastic
//! gradient descent on the mean squared error, then prints the predictions.
//! Unrelated to the cluster tooling.
//!
//! Run with `cargo run --example linear_regression`.

const EPOCHS: usize = 1000;
const LEARNING_RATE: f64 = 0.01;

/// Single-input dense unit.
#[derive(Debug, Default, Clone, Copy)]
struct Dense {
    weight: f64,
    bias: f64,
}

impl Dense {
    fn predict(&self, x: f64) -> f64 {
        self.weight * x + self.bias
    }

    /// One full pass over the data, updating after every sample.
    fn train_epoch(&mut self, xs: &[f64], ys: &[f64], learning_rate: f64) -> f64 {
        let mut loss = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            let error = self.predict(x) - y;
            loss += error * error;
            // d/dw (err^2) = 2 err x, d/db (err^2) = 2 err
            self.weight -= learning_rate * 2.0 * error * x;
            self.bias -= learning_rate * 2.0 * error;
        }
        loss / xs.len() as f64
    }
}

fn main() {
    let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
    let ys = [2.0, 3.0, 4.0, 5.0, 6.0];

    let mut model = Dense::default();
    let mut loss = f64::NAN;
    for _ in 0..EPOCHS {
        loss = model.train_epoch(&xs, &ys, LEARNING_RATE);
    }

    let predictions: Vec<f64> = xs.iter().map(|&x| model.predict(x)).collect();
    println!(
        "Model: y = {:.4} * x + {:.4} (mse {:.6})",
        model.weight, model.bias, loss
    );
    println!("Predictions: {:?}", predictions);
}
