//! Writes a deterministic sample film CSV for trying out the dashboard:
//! `cargo run --bin generate_sample && cargo run -- sample_films.csv`

use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One CSV row in the canonical header convention the loader accepts.
#[derive(Serialize)]
struct SampleRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Director")]
    director: String,
    #[serde(rename = "Stars")]
    stars: String,
    #[serde(rename = "ReleaseYear")]
    release_year: String,
    #[serde(rename = "Duration")]
    duration: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "IMDb-Rating")]
    rating: String,
}

const GENRES: &[&str] = &[
    "Drama", "Action", "Comedy", "Crime", "Thriller", "Romance", "Adventure", "Sci-Fi", "Horror",
    "Western", "Mystery", "Biography",
];

const DIRECTORS: &[&str] = &[
    "Ava Lindqvist",
    "Marco Beltrane",
    "Sofia Ueda",
    "Hal Okafor",
    "June Carraway",
    "Teodor Malin",
    "Priya Venkatesan",
    "Lena Brandt",
];

const STARS: &[&str] = &[
    "R. Calloway, M. Trent",
    "D. Osei, F. Marchetti",
    "K. Larsen, T. Ibarra",
    "S. Novak, A. Reyes",
];

fn main() {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_films.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    let n_films = 400;
    for i in 0..n_films {
        // Years spread over a century so every decade has frames.
        let year = 1920 + (rng.next_u64() % 103) as i32;

        // One to three genres, occasionally none (exercises the Unknown tag).
        let category = if i % 57 == 0 {
            String::new()
        } else {
            let n = 1 + (rng.next_u64() % 3) as usize;
            let mut picked: Vec<&str> = Vec::new();
            for _ in 0..n {
                let g = *rng.pick(GENRES);
                if !picked.contains(&g) {
                    picked.push(g);
                }
            }
            picked.join(", ")
        };

        // A handful of malformed durations (exercises the absent marker).
        let duration = if i % 71 == 0 {
            "n/a".to_string()
        } else {
            format!("{} min", 75 + (rng.next_u64() % 110))
        };

        let rating = format!("{:.1}", 7.6 + rng.next_f64() * 1.6);

        writer
            .serialize(SampleRow {
                title: format!("Picture No. {}", i + 1),
                director: rng.pick(DIRECTORS).to_string(),
                stars: rng.pick(STARS).to_string(),
                release_year: year.to_string(),
                duration,
                category,
                rating,
            })
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output file");
    println!("Wrote {n_films} films to {output_path}");
}
