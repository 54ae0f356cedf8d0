//! Status helper enums mapping to SMALLSERIAL lookup tables.
//!
//! Each variant's discriminant matches the seed data order (1-based) in the
//! corresponding `*_statuses` table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a database status ID, `None` for unknown IDs.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Upper-case label used in API payloads.
            pub fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    };
}

define_status_enum! {
    /// Annotation task lifecycle status.
    TaskStatus {
        Pending = 1 => "PENDING",
        InProgress = 2 => "IN_PROGRESS",
        Done = 3 => "DONE",
    }
}

/// Label for a raw status id, falling back to `UNKNOWN`.
pub fn task_status_label(id: StatusId) -> &'static str {
    TaskStatus::from_id(id).map_or("UNKNOWN", TaskStatus::label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_seed_order() {
        assert_eq!(TaskStatus::Pending.id(), 1);
        assert_eq!(TaskStatus::InProgress.id(), 2);
        assert_eq!(TaskStatus::Done.id(), 3);
    }

    #[test]
    fn from_id_round_trips() {
        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(TaskStatus::from_id(9), None);
    }

    #[test]
    fn labels() {
        assert_eq!(task_status_label(2), "IN_PROGRESS");
        assert_eq!(task_status_label(0), "UNKNOWN");
    }
}
