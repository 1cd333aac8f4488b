use rand::thread_rng;
use rand::Rng;
use std::fmt;
use itertools::{iproduct, Itertools};
use tracing::debug;

use super::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Mine,
    Clear(u8)
}

impl Content {
    pub fn is_mine(&self) -> bool {
        match *self {
            Content::Mine => true,
            _ => false
        }
    }
}

/// A cell coordinate, `Point(x, y)`.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub struct Point(pub usize, pub usize);

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSize {
    width: usize,
    height: usize
}

impl BoardSize {
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.0 < self.width && point.1 < self.height
    }

    /// Every point of the grid, row by row.
    pub fn points(&self) -> Vec<Point> {
        iproduct!(0..self.height, 0..self.width)
            .map(|(y, x)| Point(x, y))
            .collect()
    }

    fn neighbor_points(&self, point: &Point) -> Vec<Point> {
        iproduct!(-1..=1i64, -1..=1i64)
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(|(dx, dy)| (point.0 as i64 + dx, point.1 as i64 + dy))
            .filter(|&(x, y)| x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64)
            .map(|(x, y)| Point(x as usize, y as usize))
            .collect()
    }

    fn check(&self, point: &Point) -> Result<()> {
        if self.contains(point) {
            Ok(())
        } else {
            Err(Error::OutOfBounds { point: *point, width: self.width, height: self.height })
        }
    }
}

fn validate(width: usize, height: usize, mine_count: usize) -> Result<BoardSize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidConfiguration(
            format!("field size must be positive, got {}x{}", width, height)));
    }
    let area = width.checked_mul(height).ok_or_else(|| Error::InvalidConfiguration(
        format!("a {}x{} field is too large", width, height)))?;
    if mine_count >= area {
        return Err(Error::InvalidConfiguration(
            format!("{} mines do not fit in a {}x{} field", mine_count, width, height)));
    }
    Ok(BoardSize{width, height})
}

// Counts are bounded by the grid's allocation, so saturation never triggers.
fn signed(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// What an adapter needs to draw one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellState {
    pub content: Content,
    pub revealed: bool,
    pub flagged: bool
}

/// The grid of one game. Mines are placed once, at construction; a new game
/// is a new `Minefield`.
#[derive(Debug, Clone)]
pub struct Minefield {
    size: BoardSize,
    mine_count: usize,
    layout: Vec<Vec<Content>>,
    revealed: Vec<Vec<bool>>,
    flagged: Vec<Vec<bool>>
}

impl fmt::Display for Minefield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.size.points().chunks(self.size.width) {
            let line: String = row.iter().map(|point| self.cell_to_str(point)).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl Minefield {
    /// Builds a game-ready field with `mine_count` mines at uniformly random cells.
    pub fn new(width: usize, height: usize, mine_count: usize) -> Result<Minefield> {
        Minefield::with_rng(width, height, mine_count, &mut thread_rng())
    }

    pub fn with_rng<R: Rng>(width: usize, height: usize, mine_count: usize, rng: &mut R) -> Result<Minefield> {
        let size = validate(width, height, mine_count)?;
        let mut field = Minefield::empty(size, mine_count);
        field.place_mines(rng);
        debug!(width, height, mine_count, "placed mines");
        Ok(field)
    }

    /// Builds a field with mines at exactly the given points.
    pub fn from_mines(width: usize, height: usize, mines: &[Point]) -> Result<Minefield> {
        let size = validate(width, height, mines.len())?;
        for point in mines {
            size.check(point)?;
        }
        if let Some(point) = mines.iter().duplicates().next() {
            return Err(Error::InvalidConfiguration(
                format!("mine at {} listed twice", point)));
        }
        let mut field = Minefield::empty(size, mines.len());
        for point in mines {
            field.place_mine(point);
        }
        Ok(field)
    }

    fn empty(size: BoardSize, mine_count: usize) -> Minefield {
        Minefield {
            size,
            mine_count,
            layout: vec![vec![Content::Clear(0); size.width]; size.height],
            revealed: vec![vec![false; size.width]; size.height],
            flagged: vec![vec![false; size.width]; size.height]
        }
    }

    // Only ever increments counts, so it must run exactly once per field.
    fn place_mines<R: Rng>(&mut self, rng: &mut R) {
        let mut mines_left = self.mine_count;
        while mines_left > 0 {
            let point = Point(rng.gen_range(0..self.size.width), rng.gen_range(0..self.size.height));
            if !self.content(&point).is_mine() {
                self.place_mine(&point);
                mines_left -= 1;
            }
        }
    }

    fn place_mine(&mut self, point: &Point) {
        self.layout[point.1][point.0] = Content::Mine;
        for neighbor in self.size.neighbor_points(point) {
            if let Content::Clear(count) = &mut self.layout[neighbor.1][neighbor.0] {
                *count += 1;
            }
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    fn content(&self, point: &Point) -> Content {
        self.layout[point.1][point.0]
    }

    fn is_revealed(&self, point: &Point) -> bool {
        self.revealed[point.1][point.0]
    }

    /// The in-bounds cells around `point`, diagonals included. Order is not meaningful.
    pub fn neighbors(&self, point: &Point) -> Result<Vec<Point>> {
        self.size.check(point)?;
        Ok(self.size.neighbor_points(point))
    }

    pub fn cell_state(&self, point: &Point) -> Result<CellState> {
        self.size.check(point)?;
        Ok(CellState {
            content: self.content(point),
            revealed: self.is_revealed(point),
            flagged: self.flagged[point.1][point.0]
        })
    }

    /// Reveals `point`, cascading through cells with no adjacent mines.
    /// Returns whether `point` holds a mine.
    pub fn reveal(&mut self, point: &Point) -> Result<bool> {
        self.size.check(point)?;
        let mut pending = vec![*point];
        while let Some(current) = pending.pop() {
            if self.is_revealed(&current) {
                continue;
            }
            self.revealed[current.1][current.0] = true;
            if self.content(&current) == Content::Clear(0) {
                pending.extend(self.size.neighbor_points(&current).into_iter()
                    .filter(|neighbor| !self.is_revealed(neighbor)));
            }
        }
        Ok(self.content(point).is_mine())
    }

    pub fn reveal_all(&mut self) {
        for row in self.revealed.iter_mut() {
            row.iter_mut().for_each(|cell| *cell = true);
        }
    }

    /// Flips the flag on `point` and returns whether the field is now won.
    pub fn toggle_flag(&mut self, point: &Point) -> Result<bool> {
        self.size.check(point)?;
        let flag = &mut self.flagged[point.1][point.0];
        *flag = !*flag;
        Ok(self.is_won())
    }

    /// Won when the flagged cells are exactly the mines, whatever has been revealed.
    pub fn is_won(&self) -> bool {
        self.layout.iter().flatten()
            .zip(self.flagged.iter().flatten())
            .all(|(content, &flagged)| flagged == content.is_mine())
    }

    pub fn is_lost(&self) -> bool {
        self.layout.iter().flatten()
            .zip(self.revealed.iter().flatten())
            .any(|(content, &revealed)| revealed && content.is_mine())
    }

    pub fn remaining_mines(&self) -> i64 {
        let flags = self.flagged.iter().flatten().filter(|&&flagged| flagged).count();
        signed(self.mine_count) - signed(flags)
    }

    fn cell_to_str(&self, point: &Point) -> String {
        if self.flagged[point.1][point.0] {
            return String::from("▶")
        }
        if !self.is_revealed(point) {
            return String::from("□")
        }
        match self.content(point) {
            Content::Mine => String::from("X"),
            Content::Clear(0) => String::from("_"),
            Content::Clear(count) => count.to_string()
        }
    }
}

#[cfg(test)]
use proptest::prelude::*;


#[cfg(test)]
mod minefield_tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mine_points(field: &Minefield) -> Vec<Point> {
        field.size.points().into_iter().filter(|point| field.content(point).is_mine()).collect()
    }

    fn revealed_points(field: &Minefield) -> Vec<Point> {
        field.size.points().into_iter().filter(|point| field.is_revealed(point)).collect()
    }

    fn field_strategy() -> impl Strategy<Value = (usize, usize, usize, u64)> {
        (1..16usize, 1..16usize)
            .prop_flat_map(|(width, height)| (Just(width), Just(height), 0..width * height, any::<u64>()))
    }

    fn field_and_point_strategy() -> impl Strategy<Value = ((usize, usize, usize, u64), Point)> {
        field_strategy().prop_flat_map(|field| {
            let (width, height, _, _) = field;
            (Just(field), (0..width, 0..height).prop_map(|(x, y)| Point(x, y)))
        })
    }

    #[test]
    fn new_rejects_bad_configuration() {
        assert!(matches!(Minefield::new(0, 8, 1), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(Minefield::new(2, 2, 4), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn from_mines_rejects_duplicates_and_strays() {
        assert!(matches!(Minefield::from_mines(3, 3, &[Point(1, 1), Point(1, 1)]),
                         Err(Error::InvalidConfiguration(_))));
        assert_eq!(Minefield::from_mines(3, 3, &[Point(3, 0)]).unwrap_err(),
                   Error::OutOfBounds{point: Point(3, 0), width: 3, height: 3});
    }

    #[test]
    fn from_mines_counts_adjacent_mines() {
        let field = Minefield::from_mines(3, 3, &[Point(0, 0), Point(2, 0)]).unwrap();
        assert_eq!(field.content(&Point(1, 0)), Content::Clear(2));
        assert_eq!(field.content(&Point(1, 1)), Content::Clear(2));
        assert_eq!(field.content(&Point(0, 1)), Content::Clear(1));
        assert_eq!(field.content(&Point(1, 2)), Content::Clear(0));
        assert_eq!(field.mine_count(), 2);
    }

    #[test]
    fn dense_field_places_every_mine() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = Minefield::with_rng(4, 4, 15, &mut rng).unwrap();
        assert_eq!(mine_points(&field).len(), 15);
    }

    #[test]
    fn cascade_reveals_everything_without_mines() {
        let mut field = Minefield::from_mines(3, 3, &[]).unwrap();
        assert_eq!(field.reveal(&Point(1, 1)), Ok(false));
        assert_eq!(revealed_points(&field).len(), 9);
    }

    #[test]
    fn cascade_stops_at_counted_cells() {
        let mut field = Minefield::from_mines(3, 3, &[Point(0, 0)]).unwrap();
        assert_eq!(field.content(&Point(0, 1)), Content::Clear(1));
        assert_eq!(field.content(&Point(1, 0)), Content::Clear(1));
        assert_eq!(field.content(&Point(1, 1)), Content::Clear(1));

        assert_eq!(field.reveal(&Point(2, 2)), Ok(false));
        for point in &[Point(1, 1), Point(1, 2), Point(2, 1), Point(2, 2)] {
            assert!(field.is_revealed(point));
        }
        assert!(!field.is_revealed(&Point(0, 0)));
        assert_eq!(revealed_points(&field).len(), 8);
        assert!(!field.is_lost());
    }

    #[test]
    fn counted_cell_reveals_only_itself() {
        let mut field = Minefield::from_mines(3, 3, &[Point(0, 0)]).unwrap();
        field.reveal(&Point(1, 1)).unwrap();
        assert_eq!(revealed_points(&field), vec![Point(1, 1)]);
    }

    #[test]
    fn revealing_a_mine_reports_loss_and_touches_nothing_else() {
        let mut field = Minefield::from_mines(3, 3, &[Point(0, 0)]).unwrap();
        assert_eq!(field.reveal(&Point(0, 0)), Ok(true));
        assert!(field.is_lost());
        assert_eq!(revealed_points(&field), vec![Point(0, 0)]);

        field.reveal_all();
        assert_eq!(revealed_points(&field).len(), 9);
    }

    #[test]
    fn flagged_cells_can_still_be_revealed() {
        let mut field = Minefield::from_mines(2, 2, &[Point(0, 0)]).unwrap();
        field.toggle_flag(&Point(1, 1)).unwrap();
        field.reveal(&Point(1, 1)).unwrap();
        let state = field.cell_state(&Point(1, 1)).unwrap();
        assert_eq!(state, CellState{content: Content::Clear(1), revealed: true, flagged: true});
    }

    #[test]
    fn win_tracks_the_flagged_set() {
        let mines = [Point(0, 0), Point(2, 1)];
        let mut field = Minefield::from_mines(3, 3, &mines).unwrap();
        assert!(!field.is_won());
        assert_eq!(field.toggle_flag(&mines[0]), Ok(false));
        assert_eq!(field.toggle_flag(&mines[1]), Ok(true));
        assert!(field.is_won());
        assert!(revealed_points(&field).is_empty());

        assert_eq!(field.toggle_flag(&Point(1, 1)), Ok(false));
        assert_eq!(field.toggle_flag(&Point(1, 1)), Ok(true));
        assert_eq!(field.toggle_flag(&mines[0]), Ok(false));
        assert!(!field.is_won());
    }

    #[test]
    fn empty_field_is_won_until_something_is_flagged() {
        let mut field = Minefield::from_mines(2, 2, &[]).unwrap();
        assert!(field.is_won());
        assert_eq!(field.toggle_flag(&Point(0, 1)), Ok(false));
    }

    #[test]
    fn remaining_mines_goes_negative_with_extra_flags() {
        let mut field = Minefield::from_mines(2, 2, &[Point(1, 1)]).unwrap();
        assert_eq!(field.remaining_mines(), 1);
        field.toggle_flag(&Point(0, 0)).unwrap();
        field.toggle_flag(&Point(0, 1)).unwrap();
        assert_eq!(field.remaining_mines(), -1);
    }

    #[test]
    fn remaining_mines_with_every_cell_flagged() {
        let mut field = Minefield::from_mines(4, 3, &[Point(0, 0), Point(3, 2)]).unwrap();
        for point in field.size.points() {
            field.toggle_flag(&point).unwrap();
        }
        assert_eq!(field.remaining_mines(), 2 - 12);
        assert_eq!(signed(usize::MAX), i64::MAX);
    }

    #[test]
    fn per_cell_operations_fail_fast_out_of_bounds() {
        let mut field = Minefield::from_mines(2, 3, &[]).unwrap();
        let outside = Point(2, 0);
        let expected = Error::OutOfBounds{point: outside, width: 2, height: 3};
        assert_eq!(field.reveal(&outside), Err(expected.clone()));
        assert_eq!(field.toggle_flag(&outside), Err(expected.clone()));
        assert_eq!(field.cell_state(&outside), Err(expected.clone()));
        assert_eq!(field.neighbors(&Point(0, 3)).unwrap_err(),
                   Error::OutOfBounds{point: Point(0, 3), width: 2, height: 3});
        assert!(revealed_points(&field).is_empty());
        assert_eq!(field.remaining_mines(), 0);
    }

    #[test]
    fn separate_fields_share_no_state() {
        let mut first = Minefield::from_mines(3, 3, &[Point(1, 1)]).unwrap();
        let second = Minefield::from_mines(3, 3, &[Point(1, 1)]).unwrap();
        first.reveal(&Point(0, 0)).unwrap();
        first.toggle_flag(&Point(1, 1)).unwrap();
        assert!(revealed_points(&second).is_empty());
        assert!(!second.cell_state(&Point(1, 1)).unwrap().flagged);
    }

    #[test]
    fn display_shows_known_cells() {
        let mut field = Minefield::from_mines(3, 2, &[Point(0, 0)]).unwrap();
        field.reveal(&Point(2, 1)).unwrap();
        field.toggle_flag(&Point(0, 0)).unwrap();
        assert_eq!(field.to_string(), "▶1_\n□1_\n");
    }

    proptest! {
        #[test]
        fn placement_matches_counts((width, height, mines, seed) in field_strategy()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let field = Minefield::with_rng(width, height, mines, &mut rng).unwrap();
            prop_assert_eq!(mine_points(&field).len(), mines);
            for point in field.size.points() {
                if let Content::Clear(count) = field.content(&point) {
                    let mined = field.neighbors(&point).unwrap().iter()
                        .filter(|neighbor| field.content(neighbor).is_mine())
                        .count();
                    prop_assert_eq!(count as usize, mined);
                }
            }
        }

        #[test]
        fn reveal_is_idempotent(((width, height, mines, seed), point) in field_and_point_strategy()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut field = Minefield::with_rng(width, height, mines, &mut rng).unwrap();
            let first = field.reveal(&point).unwrap();
            let once = revealed_points(&field);
            let second = field.reveal(&point).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(revealed_points(&field), once);
        }

        #[test]
        fn cascade_never_reveals_a_mine(((width, height, mines, seed), point) in field_and_point_strategy()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut field = Minefield::with_rng(width, height, mines, &mut rng).unwrap();
            let hit = field.reveal(&point).unwrap();
            prop_assert_eq!(hit, field.is_lost());
            if !hit {
                prop_assert!(revealed_points(&field).iter().all(|point| !field.content(point).is_mine()));
            }
        }

        #[test]
        fn flagging_exactly_the_mines_wins((width, height, mines, seed) in field_strategy()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut field = Minefield::with_rng(width, height, mines, &mut rng).unwrap();
            for point in mine_points(&field) {
                field.toggle_flag(&point).unwrap();
            }
            prop_assert!(field.is_won());
            prop_assert_eq!(field.remaining_mines(), 0);
        }
    }
}
