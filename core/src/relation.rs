//! Relation descriptors: how a logical field reaches a related table.

use compact_str::CompactString;
use hashbrown::HashMap;

/// A related table reached through a key pair.
///
/// The join condition is always `related.foreign_key = parent.local_key`:
/// for `BelongsTo` the local key is the parent's foreign key column
/// (`users.country_id`) and the foreign key is the related owner key
/// (`countries.id`); for `HasMany`/`HasOne` it is the other way round.
#[derive(Debug, Clone, PartialEq)]
pub struct Related {
    pub table: CompactString,
    pub local_key: CompactString,
    pub foreign_key: CompactString,
    pub fields: Vec<SearchField>,
}

/// Pivot table of a many-to-many relation
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub table: CompactString,
    /// Pivot column pointing at the parent's local key
    pub parent_key: CompactString,
    /// Pivot column pointing at the related table's key
    pub related_key: CompactString,
}

/// One concrete type a polymorphic relation may point at
#[derive(Debug, Clone, PartialEq)]
pub struct MorphTarget {
    /// Value stored in the parent's type column
    pub tag: CompactString,
    pub table: CompactString,
    pub key: CompactString,
}

/// A set of polymorphic targets searched with the same field list
#[derive(Debug, Clone, PartialEq)]
pub struct MorphGroup {
    pub targets: Vec<MorphTarget>,
    pub fields: Vec<CompactString>,
}

/// Polymorphic relation stored as a (type, id) column pair on the parent
#[derive(Debug, Clone, PartialEq)]
pub struct Morph {
    pub type_column: CompactString,
    pub id_column: CompactString,
    pub groups: Vec<MorphGroup>,
}

/// Leaf of a nested-through field: one column or any of several
#[derive(Debug, Clone, PartialEq)]
pub enum NestedLeaf {
    One(CompactString),
    Any(Vec<CompactString>),
}

impl NestedLeaf {
    pub fn columns(&self) -> &[CompactString] {
        match self {
            NestedLeaf::One(column) => core::slice::from_ref(column),
            NestedLeaf::Any(columns) => columns,
        }
    }
}

/// A searchable / sortable sub-field of a relation
#[derive(Debug, Clone, PartialEq)]
pub enum SearchField {
    /// A column on the related table
    Column(CompactString),
    /// A column reached through a relation declared on the related entity
    Nested {
        through: Box<RelationDescriptor>,
        leaf: NestedLeaf,
    },
}

/// How a logical field that is not a direct column is reached.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationDescriptor {
    BelongsTo(Related),
    HasMany(Related),
    HasOne(Related),
    BelongsToMany { related: Related, pivot: Pivot },
    MorphTo(Morph),
}

impl RelationDescriptor {
    /// `parent.local_key` references `table.foreign_key`
    pub fn belongs_to(
        table: impl Into<CompactString>,
        local_key: impl Into<CompactString>,
        foreign_key: impl Into<CompactString>,
    ) -> Self {
        Self::BelongsTo(Related::new(table, local_key, foreign_key))
    }

    /// `table.foreign_key` references `parent.local_key`
    pub fn has_many(
        table: impl Into<CompactString>,
        foreign_key: impl Into<CompactString>,
        local_key: impl Into<CompactString>,
    ) -> Self {
        Self::HasMany(Related::new(table, local_key, foreign_key))
    }

    /// `table.foreign_key` references `parent.local_key`
    pub fn has_one(
        table: impl Into<CompactString>,
        foreign_key: impl Into<CompactString>,
        local_key: impl Into<CompactString>,
    ) -> Self {
        Self::HasOne(Related::new(table, local_key, foreign_key))
    }

    /// Many-to-many through `pivot`; `local_key` is the parent key and
    /// `foreign_key` the related key the pivot columns point at.
    pub fn belongs_to_many(
        table: impl Into<CompactString>,
        pivot: Pivot,
        local_key: impl Into<CompactString>,
        foreign_key: impl Into<CompactString>,
    ) -> Self {
        Self::BelongsToMany {
            related: Related::new(table, local_key, foreign_key),
            pivot,
        }
    }

    pub fn morph_to(type_column: impl Into<CompactString>, id_column: impl Into<CompactString>) -> Self {
        Self::MorphTo(Morph {
            type_column: type_column.into(),
            id_column: id_column.into(),
            groups: Vec::new(),
        })
    }

    /// Appends a searchable column on the related table.
    ///
    /// Ignored for `MorphTo`, which declares its fields per group.
    pub fn field(mut self, name: impl Into<CompactString>) -> Self {
        if let Some(related) = self.related_mut() {
            related.fields.push(SearchField::Column(name.into()));
        }
        self
    }

    pub fn fields<I>(self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CompactString>,
    {
        names.into_iter().fold(self, Self::field)
    }

    /// Appends a field reached through `through`, a relation of the related entity.
    pub fn nested(mut self, through: RelationDescriptor, leaf: NestedLeaf) -> Self {
        if let Some(related) = self.related_mut() {
            related.fields.push(SearchField::Nested {
                through: Box::new(through),
                leaf,
            });
        }
        self
    }

    /// Appends a polymorphic search group. Ignored for non-`MorphTo` relations.
    pub fn morph_group(mut self, group: MorphGroup) -> Self {
        if let RelationDescriptor::MorphTo(morph) = &mut self {
            morph.groups.push(group);
        }
        self
    }

    /// The keyed part of the relation; `None` for `MorphTo`
    pub fn related(&self) -> Option<&Related> {
        match self {
            RelationDescriptor::BelongsTo(related)
            | RelationDescriptor::HasMany(related)
            | RelationDescriptor::HasOne(related)
            | RelationDescriptor::BelongsToMany { related, .. } => Some(related),
            RelationDescriptor::MorphTo(_) => None,
        }
    }

    fn related_mut(&mut self) -> Option<&mut Related> {
        match self {
            RelationDescriptor::BelongsTo(related)
            | RelationDescriptor::HasMany(related)
            | RelationDescriptor::HasOne(related)
            | RelationDescriptor::BelongsToMany { related, .. } => Some(related),
            RelationDescriptor::MorphTo(_) => None,
        }
    }
}

impl Related {
    fn new(
        table: impl Into<CompactString>,
        local_key: impl Into<CompactString>,
        foreign_key: impl Into<CompactString>,
    ) -> Self {
        Self {
            table: table.into(),
            local_key: local_key.into(),
            foreign_key: foreign_key.into(),
            fields: Vec::new(),
        }
    }
}

impl MorphGroup {
    pub fn new<I>(fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CompactString>,
    {
        Self {
            targets: Vec::new(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn target(
        mut self,
        tag: impl Into<CompactString>,
        table: impl Into<CompactString>,
        key: impl Into<CompactString>,
    ) -> Self {
        self.targets.push(MorphTarget {
            tag: tag.into(),
            table: table.into(),
            key: key.into(),
        });
        self
    }
}

/// Logical field name → relation, for every field that is not a direct column.
#[derive(Debug, Clone, Default)]
pub struct RelationCatalog {
    relations: HashMap<CompactString, RelationDescriptor>,
}

impl RelationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<CompactString>, relation: RelationDescriptor) -> Self {
        self.relations.insert(field.into(), relation);
        self
    }

    #[inline]
    pub fn get(&self, field: &str) -> Option<&RelationDescriptor> {
        self.relations.get(field)
    }

    #[inline]
    pub fn contains(&self, field: &str) -> bool {
        self.relations.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
