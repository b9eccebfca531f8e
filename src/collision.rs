use crate::geometry::Geometry;
use crate::snake::Snake;

pub fn hits_wall(snake: &Snake, geometry: &Geometry) -> bool {
    !geometry.in_bounds(snake.head())
}

pub fn hits_self(snake: &Snake) -> bool {
    let head = snake.head();
    snake.body().iter().skip(1).any(|&cell| cell == head)
}

/// Whether the game cannot continue with this snake on the board.
pub fn is_terminal(snake: &Snake, geometry: &Geometry) -> bool {
    hits_wall(snake, geometry) || hits_self(snake)
}
