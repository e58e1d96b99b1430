//! Union and intersection normalization
//!
//! Every union or intersection built through these constructors is flat (no
//! nested member of the same kind), free of duplicates and never a singleton.

use crate::ty::Type;

impl Type {
    /// Build a normalized union type
    ///
    /// Nested unions are flattened, `never` members are dropped and duplicate
    /// members are removed keeping the first occurrence. A single surviving
    /// member is returned as-is and an empty union is `never`.
    pub fn union<I>(members: I) -> Type
    where
        I: IntoIterator<Item = Type>,
    {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Type::Union(inner) => {
                    for ty in inner {
                        push_unique(&mut flat, ty, true);
                    }
                }
                other => push_unique(&mut flat, other, true),
            }
        }
        collapse(flat, Type::Never, Type::Union)
    }

    /// Build a normalized intersection type
    ///
    /// Nested intersections are flattened and duplicates removed. A single
    /// surviving member is returned as-is and an empty intersection is `any`.
    pub fn intersection<I>(members: I) -> Type
    where
        I: IntoIterator<Item = Type>,
    {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Type::Intersection(inner) => {
                    for ty in inner {
                        push_unique(&mut flat, ty, false);
                    }
                }
                other => push_unique(&mut flat, other, false),
            }
        }
        collapse(flat, Type::Any, Type::Intersection)
    }
}

fn push_unique(members: &mut Vec<Type>, ty: Type, drop_never: bool) {
    if drop_never && ty.is_never() {
        return;
    }
    if !members.contains(&ty) {
        members.push(ty);
    }
}

fn collapse(mut members: Vec<Type>, empty: Type, build: fn(Vec<Type>) -> Type) -> Type {
    match members.len() {
        0 => empty,
        1 => members.pop().unwrap_or(empty),
        _ => build(members),
    }
}
