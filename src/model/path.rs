use displaydoc::Display;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error when parsing a path, point or range
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// The path {0:?} is empty
    Empty(String),
    /// The index {0:?} is not a number
    BadIndex(String),
    /// The point {0:?} needs an offset (e.g. `0.0:3`)
    MissingOffset(String),
}

/// Child indices from the document root down to a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Path(pub Vec<usize>);

impl Path {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn root_index(&self) -> Option<usize> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            Some(Path(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Path(indices)
    }

    /// Strict ancestor check
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Document order, where a node compares equal to all of its ancestors
    pub fn compare(&self, other: &Path) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for index in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", index)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PathParseError::Empty(s.to_owned()));
        }
        s.split('.')
            .map(|part| {
                part.parse::<usize>()
                    .map_err(|_| PathParseError::BadIndex(part.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
    }
}

/// A position within a text leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Point {
    pub path: Path,
    /// Offset in chars
    pub offset: usize,
}

impl Point {
    pub fn new<P: Into<Path>>(path: P, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    pub fn compare(&self, other: &Point) -> Ordering {
        match self.path.compare(&other.path) {
            Ordering::Equal => self.offset.cmp(&other.offset),
            ord => ord,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.offset)
    }
}

impl FromStr for Point {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, offset) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| PathParseError::MissingOffset(s.to_owned()))?;
        let offset = offset
            .parse()
            .map_err(|_| PathParseError::BadIndex(offset.to_owned()))?;
        Ok(Point {
            path: path.parse()?,
            offset,
        })
    }
}

/// A selection between two points
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.anchor.compare(&self.focus) == Ordering::Greater
    }

    /// The start and end point in document order
    pub fn edges(&self) -> (&Point, &Point) {
        if self.is_backward() {
            (&self.focus, &self.anchor)
        } else {
            (&self.anchor, &self.focus)
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collapsed() {
            write!(f, "{}", self.anchor)
        } else {
            write!(f, "{}-{}", self.anchor, self.focus)
        }
    }
}

impl FromStr for Range {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((anchor, focus)) => Ok(Range::new(anchor.parse()?, focus.parse()?)),
            None => s.parse().map(Range::collapsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Path, Point, Range};
    use std::cmp::Ordering;

    #[test]
    fn test_compare() {
        let a = Path::new(vec![0, 1]);
        assert_eq!(a.compare(&Path::new(vec![0])), Ordering::Equal);
        assert_eq!(a.compare(&Path::new(vec![0, 2, 0])), Ordering::Less);
        assert_eq!(a.compare(&Path::new(vec![0, 0, 5])), Ordering::Greater);
        assert!(Path::new(vec![0]).is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&a));
    }

    #[test]
    fn test_parse_range() {
        let range: Range = "0.0:1-2.0.0:3".parse().unwrap();
        assert_eq!(range.anchor, Point::new(vec![0, 0], 1));
        assert_eq!(range.focus, Point::new(vec![2, 0, 0], 3));
        assert_eq!(range.to_string(), "0.0:1-2.0.0:3");

        let cursor: Range = "1.0:0".parse().unwrap();
        assert!(cursor.is_collapsed());
        assert!("1.x:0".parse::<Range>().is_err());
        assert!("1.0".parse::<Point>().is_err());
    }

    #[test]
    fn test_backward_edges() {
        let range = Range::new(Point::new(vec![1, 0], 0), Point::new(vec![0, 0], 2));
        assert!(range.is_backward());
        let (start, end) = range.edges();
        assert_eq!(start.path, Path::new(vec![0, 0]));
        assert_eq!(end.path, Path::new(vec![1, 0]));
    }
}
