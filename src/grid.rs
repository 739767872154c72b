use rand::Rng;
use std::collections::VecDeque;

/// A grid-aligned position. The origin is the centre of the window and
/// `y` grows upwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Inclusive play field `[-half_width, half_width] x [-half_height, half_height]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub half_width: i32,
    pub half_height: i32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            half_width: (width / 2) as i32,
            half_height: (height / 2) as i32,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= -self.half_width
            && cell.x <= self.half_width
            && cell.y >= -self.half_height
            && cell.y <= self.half_height
    }

    // Food keeps one segment away from every edge.
    fn spawn_range(&self, step: i32) -> ((i32, i32), (i32, i32)) {
        (
            (-self.half_width + step, self.half_width - step),
            (-self.half_height + step, self.half_height - step),
        )
    }
}

pub fn distance(a: Cell, b: Cell) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn snap(value: i32, step: i32) -> i32 {
    value - value.rem_euclid(step)
}

/// Number of distinct cells `random_free_cell` can ever return.
pub fn spawn_cell_count(bounds: &Bounds, step: i32) -> usize {
    let ((x_lo, x_hi), (y_lo, y_hi)) = bounds.spawn_range(step);
    let columns = (snap(x_hi, step) - snap(x_lo, step)) / step + 1;
    let rows = (snap(y_hi, step) - snap(y_lo, step)) / step + 1;
    (columns.max(0) * rows.max(0)) as usize
}

/// Samples spawn cells until one is not occupied by the snake.
///
/// Panics when the snake covers every spawnable cell: there is nowhere left
/// to put food and the game cannot continue.
pub fn random_free_cell<R: Rng>(
    bounds: &Bounds,
    step: i32,
    occupied: &VecDeque<Cell>,
    rng: &mut R,
) -> Cell {
    let ((x_lo, x_hi), (y_lo, y_hi)) = bounds.spawn_range(step);
    let capacity = spawn_cell_count(bounds, step);
    let blocked = occupied
        .iter()
        .filter(|c| {
            c.x >= snap(x_lo, step)
                && c.x <= x_hi
                && c.y >= snap(y_lo, step)
                && c.y <= y_hi
                && c.x.rem_euclid(step) == 0
                && c.y.rem_euclid(step) == 0
        })
        .count();
    assert!(blocked < capacity, "no free cell left for food");

    loop {
        let x = snap(rng.gen_range(x_lo..=x_hi), step);
        let y = snap(rng.gen_range(y_lo..=y_hi), step);
        let cell = Cell::new(x, y);
        if !occupied.contains(&cell) {
            return cell;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn bounds_are_inclusive() {
        let bounds = Bounds::new(800, 600);
        assert!(bounds.contains(Cell::new(400, 300)));
        assert!(bounds.contains(Cell::new(-400, -300)));
        assert!(!bounds.contains(Cell::new(420, 0)));
        assert!(!bounds.contains(Cell::new(0, -320)));
    }

    #[test]
    fn snapping_floors_negative_values() {
        assert_eq!(snap(-379, 20), -380);
        assert_eq!(snap(-380, 20), -380);
        assert_eq!(snap(379, 20), 360);
        assert_eq!(snap(0, 20), 0);
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(Cell::new(0, 0), Cell::new(3, 4)), 5.0);
        assert!(distance(Cell::new(0, 0), Cell::new(20, 0)) >= 20.0);
    }

    #[test]
    fn default_field_spawn_cells() {
        // x in -380..=380, y in -280..=280 on a 20 px grid
        assert_eq!(spawn_cell_count(&Bounds::new(800, 600), 20), 39 * 29);
    }

    #[test]
    fn finds_last_free_cell() {
        let bounds = Bounds::new(80, 80);
        // spawn range is -20..=20 per axis: 3x3 cells
        let mut occupied: VecDeque<Cell> = VecDeque::new();
        for x in [-20, 0, 20] {
            for y in [-20, 0, 20] {
                if (x, y) != (20, -20) {
                    occupied.push_back(Cell::new(x, y));
                }
            }
        }
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(
            random_free_cell(&bounds, 20, &occupied, &mut rng),
            Cell::new(20, -20)
        );
    }

    #[test]
    #[should_panic(expected = "no free cell")]
    fn full_board_fails_fast() {
        let bounds = Bounds::new(40, 40);
        let occupied: VecDeque<Cell> = [Cell::new(0, 0)].into_iter().collect();
        let mut rng = SmallRng::seed_from_u64(1);
        random_free_cell(&bounds, 20, &occupied, &mut rng);
    }

    proptest! {
        #[test]
        fn food_never_lands_on_snake(seed in any::<u64>(), len in 1usize..200) {
            let bounds = Bounds::new(800, 600);
            let mut rng = SmallRng::seed_from_u64(seed);
            let snake: VecDeque<Cell> = (0..len as i32)
                .map(|i| Cell::new(-380 + (i % 39) * 20, -280 + (i / 39) * 20))
                .collect();
            let food = random_free_cell(&bounds, 20, &snake, &mut rng);
            prop_assert!(!snake.contains(&food));
            prop_assert_eq!(food.x.rem_euclid(20), 0);
            prop_assert_eq!(food.y.rem_euclid(20), 0);
            prop_assert!(food.x.abs() <= 380 && food.y.abs() <= 280);
        }
    }
}
