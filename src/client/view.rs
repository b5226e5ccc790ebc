//! View-State Engine: turns the cached collection plus presentation
//! controls into what the list shows.
//!
//! `render` is pure. The only randomness lives in [`shuffle_order`], whose
//! result is frozen into [`ViewState::shuffle`] until the next shuffle.

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::movie::{Movie, MovieId};

/// Name ordering for the sorted view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Presentation controls. `shuffle` holds the frozen permutation while
/// shuffle mode is on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub sort: SortDirection,
    pub grouped: bool,
    pub shuffle: Option<Vec<MovieId>>,
}

impl ViewState {
    pub fn is_shuffled(&self) -> bool {
        self.shuffle.is_some()
    }

    /// Flip the sort direction and leave shuffle mode.
    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
        self.shuffle = None;
    }

    /// Flip grouping and leave shuffle mode.
    pub fn toggle_group(&mut self) {
        self.grouped = !self.grouped;
        self.shuffle = None;
    }

    /// Enter shuffle mode with a freshly drawn order.
    pub fn freeze(&mut self, order: Vec<MovieId>) {
        self.shuffle = Some(order);
    }
}

/// Movies sharing one genre, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreGroup<'a> {
    pub genre: &'a str,
    pub movies: Vec<&'a Movie>,
}

/// Output of [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<'a> {
    Flat(Vec<&'a Movie>),
    Grouped(Vec<GenreGroup<'a>>),
}

impl<'a> Rendered<'a> {
    /// Every rendered movie in display order, groups flattened.
    pub fn movies(&self) -> Vec<&'a Movie> {
        match self {
            Rendered::Flat(movies) => movies.clone(),
            Rendered::Grouped(groups) => groups
                .iter()
                .flat_map(|g| g.movies.iter().copied())
                .collect(),
        }
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.movies().into_iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        match self {
            Rendered::Flat(movies) => movies.len(),
            Rendered::Grouped(groups) => groups.iter().map(|g| g.movies.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lay out `movies` according to `view`.
///
/// Shuffled: the frozen order, skipping ids no longer cached, followed by
/// cached movies the order has never seen (added since the shuffle).
/// Otherwise: stable sort by name in `view.sort` direction. Grouping keeps
/// that order inside each genre; genres appear in first-seen order.
pub fn render<'a>(movies: &'a [Movie], view: &ViewState) -> Rendered<'a> {
    let ordered = match &view.shuffle {
        Some(order) => frozen(movies, order),
        None => sorted(movies, view.sort),
    };

    if !view.grouped {
        return Rendered::Flat(ordered);
    }

    let mut groups: Vec<GenreGroup<'a>> = Vec::new();
    for movie in ordered {
        match groups.iter_mut().find(|g| g.genre == movie.genre) {
            Some(group) => group.movies.push(movie),
            None => groups.push(GenreGroup {
                genre: &movie.genre,
                movies: vec![movie],
            }),
        }
    }
    Rendered::Grouped(groups)
}

/// Draw a uniform random permutation of the cached ids (Fisher-Yates).
pub fn shuffle_order<R: Rng + ?Sized>(movies: &[Movie], rng: &mut R) -> Vec<MovieId> {
    let mut ids: Vec<MovieId> = movies.iter().map(|m| m.id).collect();
    ids.shuffle(rng);
    ids
}

/// Case-insensitive first, lowercase before uppercase on ties, then
/// plain code-point order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| {
            let upper = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();
            upper(a).cmp(&upper(b))
        })
        .then_with(|| a.cmp(b))
}

fn sorted(movies: &[Movie], direction: SortDirection) -> Vec<&Movie> {
    let mut out: Vec<&Movie> = movies.iter().collect();
    match direction {
        SortDirection::Ascending => out.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortDirection::Descending => out.sort_by(|a, b| compare_names(&b.name, &a.name)),
    }
    out
}

fn frozen<'a>(movies: &'a [Movie], order: &[MovieId]) -> Vec<&'a Movie> {
    let mut out: Vec<&Movie> = order
        .iter()
        .filter_map(|id| movies.iter().find(|m| m.id == *id))
        .collect();
    out.extend(movies.iter().filter(|m| !order.contains(&m.id)));
    out
}
