//! Minesweeper board with lives
//!
//! Bombs are laid on the first reveal, never inside the 3x3 square around it.
//! Hitting a bomb costs a life; the game is lost when the last one goes.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::settings::Difficulty;

/// How a flag turned out once the game was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndMark {
    CorrectFlag,
    WrongFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    /// Revealed to the player
    pub visited: bool,
    pub is_flagged: bool,
    pub is_bomb: bool,
    /// Bombs among the neighbours
    pub value: u8,
    /// Bomb the player stepped on
    pub exploded: bool,
    pub end_mark: Option<EndMark>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoardState {
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    LostLife { lives_left: u32 },
    Lost,
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

#[derive(Debug, Clone)]
pub struct Board {
    width: u32,
    height: u32,
    bomb_count: u32,
    lives: u32,
    cells: Vec<Cell>,
    visible_cells: u32,
    has_been_clicked: bool,
    state: BoardState,
    rng: Pcg32,
}

impl Board {
    /// Board sized by a difficulty preset
    pub fn new(difficulty: Difficulty, lives: u32, seed: u64) -> Self {
        Self::blank(
            difficulty.width(),
            difficulty.height(),
            difficulty.bomb_count(),
            lives,
            seed,
        )
    }

    /// Custom board. At least one cell must stay free of bombs.
    pub fn with_size(width: u32, height: u32, bombs: u32, lives: u32, seed: u64) -> Result<Self> {
        match width.checked_mul(height) {
            Some(cells) if bombs < cells => Ok(Self::blank(width, height, bombs, lives, seed)),
            _ => Err(GameError::TooManyBombs {
                width,
                height,
                bombs,
            }),
        }
    }

    /// Board with bombs already laid, skipping first-click placement
    pub fn with_bombs(width: u32, height: u32, bombs: &[(i32, i32)], lives: u32) -> Result<Self> {
        if width.checked_mul(height).is_none() {
            return Err(GameError::TooManyBombs {
                width,
                height,
                bombs: bombs.len() as u32,
            });
        }
        let mut board = Self::blank(width, height, 0, lives, 0);
        for &(x, y) in bombs {
            let index = board.index(x, y)?;
            if !board.cells[index].is_bomb {
                board.cells[index].is_bomb = true;
                board.bomb_count += 1;
            }
        }
        board.place_all_numbers_in_map();
        board.has_been_clicked = true;
        Ok(board)
    }

    fn blank(width: u32, height: u32, bomb_count: u32, lives: u32, seed: u64) -> Self {
        let cells = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| Cell {
                    x,
                    y,
                    ..Default::default()
                })
            })
            .collect();
        Self {
            width,
            height,
            bomb_count,
            lives,
            cells,
            visible_cells: 0,
            has_been_clicked: false,
            state: BoardState::Ready,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bomb_count(&self) -> u32 {
        self.bomb_count
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn visible_cells(&self) -> u32 {
        self.visible_cells
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, x: i32, y: i32) -> Result<&Cell> {
        let index = self.index(x, y)?;
        Ok(&self.cells[index])
    }

    pub fn does_position_exist(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// In-bounds cells around (x, y), row by row
    pub fn neighbors(&self, x: i32, y: i32) -> Vec<(i32, i32)> {
        let mut neighbors = Vec::with_capacity(8);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if (nx, ny) != (x, y) && self.does_position_exist(nx, ny) {
                    neighbors.push((nx, ny));
                }
            }
        }
        neighbors
    }

    pub fn count_bombs_around_cell(&self, x: i32, y: i32) -> u8 {
        self.neighbors(x, y)
            .into_iter()
            .filter(|&(nx, ny)| self.cells[self.flat(nx, ny)].is_bomb)
            .count() as u8
    }

    /// Recompute every safe cell's neighbour count
    pub fn place_all_numbers_in_map(&mut self) {
        for index in 0..self.cells.len() {
            let Cell { x, y, is_bomb, .. } = self.cells[index];
            if !is_bomb {
                let value = self.count_bombs_around_cell(x as i32, y as i32);
                self.cells[index].value = value;
            }
        }
    }

    /// Lay `bomb_count` bombs outside the 3x3 square around the click.
    /// On boards too small for that, fewer bombs are laid and the count shrinks.
    pub fn place_all_bombs_in_map(&mut self, click_x: i32, click_y: i32) {
        let candidates: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| {
                !cell.is_bomb
                    && ((cell.x as i32 - click_x).abs() > 1 || (cell.y as i32 - click_y).abs() > 1)
            })
            .map(|(index, _)| index)
            .collect();

        if candidates.len() < self.bomb_count as usize {
            log::warn!(
                "Only {} free cells for {} bombs",
                candidates.len(),
                self.bomb_count
            );
        }
        let chosen: Vec<usize> = candidates
            .choose_multiple(&mut self.rng, self.bomb_count as usize)
            .copied()
            .collect();
        for index in chosen {
            self.cells[index].is_bomb = true;
        }
        self.bomb_count = self.cells.iter().filter(|cell| cell.is_bomb).count() as u32;
        log::debug!(
            "Laid {} bombs around first click ({}, {})",
            self.bomb_count,
            click_x,
            click_y
        );
    }

    pub fn cell_left_click(&mut self, x: i32, y: i32) -> Result<RevealOutcome> {
        let index = self.index(x, y)?;
        let cell = self.cells[index];
        if self.state.is_finished() || cell.is_flagged || cell.visited {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.has_been_clicked {
            self.place_all_bombs_in_map(x, y);
            self.place_all_numbers_in_map();
            self.has_been_clicked = true;
        }
        self.state = BoardState::Active;

        if self.cells[index].is_bomb {
            self.lives = self.lives.saturating_sub(1);
            let cell = &mut self.cells[index];
            cell.exploded = true;
            if self.lives > 0 {
                cell.visited = true;
                log::info!("Bomb at ({}, {}), {} lives left", x, y, self.lives);
                return Ok(RevealOutcome::LostLife {
                    lives_left: self.lives,
                });
            }
            self.game_over();
            return Ok(RevealOutcome::Lost);
        }

        self.reveal_from(index);
        if self.did_player_win() {
            self.state = BoardState::Won;
            log::info!("Board cleared with {} lives left", self.lives);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    pub fn cell_right_click(&mut self, x: i32, y: i32) -> Result<MarkOutcome> {
        let index = self.index(x, y)?;
        let cell = &mut self.cells[index];
        if self.state.is_finished() || cell.visited {
            return Ok(MarkOutcome::NoChange);
        }
        cell.is_flagged = !cell.is_flagged;
        Ok(MarkOutcome::Changed)
    }

    pub fn did_player_win(&self) -> bool {
        self.visible_cells == self.width * self.height - self.bomb_count
    }

    /// Reveal a safe cell, opening zero regions breadth-first
    fn reveal_from(&mut self, start: usize) {
        let mut to_visit = VecDeque::from([start]);
        while let Some(index) = to_visit.pop_front() {
            let cell = &mut self.cells[index];
            if cell.visited || cell.is_flagged || cell.is_bomb {
                continue;
            }
            cell.visited = true;
            self.visible_cells += 1;

            if cell.value == 0 {
                let (x, y) = (cell.x as i32, cell.y as i32);
                to_visit.extend(
                    self.neighbors(x, y)
                        .into_iter()
                        .map(|(nx, ny)| self.flat(nx, ny))
                        .filter(|&n| !self.cells[n].visited),
                );
            }
        }
    }

    /// Judge flags and show every bomb
    fn game_over(&mut self) {
        for cell in &mut self.cells {
            if cell.is_flagged {
                cell.end_mark = Some(if cell.is_bomb {
                    EndMark::CorrectFlag
                } else {
                    EndMark::WrongFlag
                });
            } else if cell.is_bomb {
                cell.visited = true;
            }
        }
        self.state = BoardState::Lost;
        log::info!("Out of lives, game lost");
    }

    fn index(&self, x: i32, y: i32) -> Result<usize> {
        if self.does_position_exist(x, y) {
            Ok(self.flat(x, y))
        } else {
            Err(GameError::InvalidCoords { x, y })
        }
    }

    fn flat(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
