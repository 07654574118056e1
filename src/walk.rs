use rand::Rng;

use crate::components::{Dir, Pos};

/// Takes `amount` clamped steps and hands each visited cell to `emit` with
/// probability `rate`.
pub fn random_walk<R, F>(
    rng: &mut R,
    width: i32,
    height: i32,
    amount: u32,
    rate: f64,
    start: Option<Pos>,
    mut emit: F,
) where
    R: Rng,
    F: FnMut(Pos),
{
    if amount == 0 || rate <= 0.0 {
        return;
    }
    let mut cursor = match start {
        Some(pos) => pos,
        None => Pos::new(rng.gen_range(0..width), rng.gen_range(0..height)),
    };
    let mut count = 0;
    while count < amount {
        cursor = cursor.step(Dir::random(rng));
        cursor.x = cursor.x.clamp(0, width - 1);
        cursor.y = cursor.y.clamp(0, height - 1);
        if rng.gen_bool(rate.min(1.0)) {
            count += 1;
            emit(cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn emits_exactly_amount_in_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut hits = Vec::new();
        random_walk(&mut rng, 12, 8, 150, 0.3, None, |pos| hits.push(pos));
        assert_eq!(hits.len(), 150);
        assert!(hits
            .iter()
            .all(|p| p.x >= 0 && p.x < 12 && p.y >= 0 && p.y < 8));
    }

    #[test]
    fn full_rate_walk_is_contiguous() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut hits = vec![Pos::new(0, 0)];
        random_walk(&mut rng, 5, 5, 200, 1.0, Some(Pos::new(0, 0)), |pos| {
            hits.push(pos)
        });
        for pair in hits.windows(2) {
            let manhattan = (pair[0].x - pair[1].x).abs() + (pair[0].y - pair[1].y).abs();
            // Zero when the step was clamped at an edge.
            assert!(manhattan <= 1, "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn zero_rate_never_emits() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut called = false;
        random_walk(&mut rng, 5, 5, 10, 0.0, None, |_| called = true);
        assert!(!called);
    }

    #[test]
    fn same_seed_same_walk() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut hits = Vec::new();
            random_walk(&mut rng, 30, 30, 40, 0.1, None, |pos| hits.push(pos));
            hits
        };
        assert_eq!(run(9), run(9));
    }
}
