use std::collections::HashSet;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::geometry::Geometry;
use crate::Coords;

/// Random draws tried before falling back to scanning for free cells.
const MAX_SAMPLES: usize = 32;

/// Picks a cell not in `occupied`, uniformly among the free ones.
/// Returns `None` once the board is full.
pub fn place_food<R: Rng>(rng: &mut R, geometry: &Geometry, occupied: &HashSet<Coords>) -> Option<Coords> {
    let n = geometry.cells_per_side();

    for _ in 0..MAX_SAMPLES {
        let cell = geometry.cell_at(rng.gen_range(0..n), rng.gen_range(0..n));
        if !occupied.contains(&cell) {
            return Some(cell);
        }
    }

    // Crowded board, stop guessing
    geometry.cells().filter(|cell| !occupied.contains(cell)).choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn never_lands_on_occupied_cells() {
        let g = Geometry::new(400, 20).unwrap();
        let occupied: HashSet<Coords> = [(100, 200), (80, 200), (60, 200)].iter().copied().collect();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let food = place_food(&mut rng, &g, &occupied).unwrap();
            assert!(!occupied.contains(&food));
            assert!(g.in_bounds(food));
            assert_eq!(food.0 % 20, 0);
            assert_eq!(food.1 % 20, 0);
        }
    }

    #[test]
    fn finds_the_last_free_cell() {
        let g = Geometry::new(80, 20).unwrap();
        let mut occupied: HashSet<Coords> = g.cells().collect();
        occupied.remove(&(40, 60));
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            assert_eq!(place_food(&mut rng, &g, &occupied), Some((40, 60)));
        }
    }

    #[test]
    fn full_board_has_no_food() {
        let g = Geometry::new(80, 20).unwrap();
        let occupied: HashSet<Coords> = g.cells().collect();
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(place_food(&mut rng, &g, &occupied), None);
    }

    #[test]
    fn empty_board_reaches_every_cell() {
        let g = Geometry::new(80, 20).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let seen: HashSet<Coords> = (0..2000)
            .filter_map(|_| place_food(&mut rng, &g, &HashSet::new()))
            .collect();

        assert_eq!(seen.len(), g.cell_count());
    }
}
