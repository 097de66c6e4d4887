use crate::record::{GedDoc, Record};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::hash::Hash;

impl GedDoc {
    /// A [`Selector`] over all the top-level (level 0) records, in file order. This is the starting point for all
    /// queries.
    pub fn all(&self) -> Selector<'_> {
        Selector::new(self, self.roots().iter().collect())
    }
}

/// An immutable, ordered selection of [`Record`]s within a [`GedDoc`].
///
/// Every operation returns a new `Selector` (or a projection of one, like a `Vec<&str>`), and leaves its receiver
/// untouched, so you can chain them freely:
///
/// ```
/// use gedq::GedDoc;
///
/// let doc = GedDoc::parse("0 @I1@ INDI\n1 NAME John /Smith/\n1 SEX M\n").unwrap();
/// let sexes = doc.all().tag("INDI").attr_equal("NAME", &["John /Smith/"]).get_attr(&["SEX"]);
/// assert_eq!(sexes, vec!["M"]);
/// ```
///
/// Order is preserved throughout: filters keep the surviving records in their original order, and navigation yields
/// children record-by-record, each in file order. The only exception is deduplication, which keeps the first
/// occurrence of each key.
///
/// Finding nothing is never an error; it's just an empty selection. The only failures are dereferences of pointers
/// that aren't in the document's registry (see [`LookupError`]).
#[derive(Clone, Debug)]
pub struct Selector<'a> {
    doc: &'a GedDoc,
    records: Vec<&'a Record>,
}

/// A dereferenced pointer wasn't declared anywhere in the document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LookupError {
    pointer: String,
}

impl LookupError {
    /// The reference that couldn't be resolved, as it appeared in the record's value (for example, `@F1@`).
    pub fn pointer(&self) -> &str {
        &self.pointer
    }
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "no record declares pointer {:?}", self.pointer)
    }
}

impl std::error::Error for LookupError {}

impl<'a> Selector<'a> {
    pub(crate) fn new(doc: &'a GedDoc, records: Vec<&'a Record>) -> Self {
        Self { doc, records }
    }

    fn with(&self, records: Vec<&'a Record>) -> Self {
        Self::new(self.doc, records)
    }

    /// All direct children of all selected records: per record, then across records.
    fn children(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().flat_map(|&record| record.children())
    }

    fn resolve(&self, reference: &str) -> Result<&'a Record, LookupError> {
        self.doc.lookup(reference).ok_or_else(|| LookupError {
            pointer: reference.to_string(),
        })
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<&'a Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Filters

    /// Keeps the records whose own tag is `name`.
    pub fn tag(&self, name: &str) -> Self {
        self.with(self.records.iter().copied().filter(|r| r.tag() == name).collect())
    }

    /// Keeps a record if at least one of its direct children is tagged `name` and has one of the given values.
    ///
    /// The record itself is kept (not the child), and only once, no matter how many of its children match.
    pub fn attr_equal(&self, name: &str, values: &[&str]) -> Self {
        self.attr_cond(name, |value| contains(values, value))
    }

    /// Keeps a record if at least one of its direct children is tagged `name` and has a value that's _not_ one of the
    /// given values. Records without any such child are dropped.
    pub fn attr_exclude(&self, name: &str, values: &[&str]) -> Self {
        self.attr_cond(name, |value| !contains(values, value))
    }

    /// Keeps a record if at least one of its direct children is tagged `name` and has a value satisfying `predicate`.
    pub fn attr_cond<F>(&self, name: &str, predicate: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        self.with(
            self.records
                .iter()
                .copied()
                .filter(|r| r.children().iter().any(|c| c.tag() == name && predicate(c.value())))
                .collect(),
        )
    }

    /// Keeps the records that have any children at all.
    pub fn require_sub(&self) -> Self {
        self.with(
            self.records
                .iter()
                .copied()
                .filter(|r| !r.children().is_empty())
                .collect(),
        )
    }

    /// Keeps a record if it has a direct child tagged `child`, which itself has a direct child tagged `grandchild`.
    pub fn require_sub_attr(&self, child: &str, grandchild: &str) -> Self {
        self.with(
            self.records
                .iter()
                .copied()
                .filter(|r| {
                    r.children()
                        .iter()
                        .any(|c| c.tag() == child && c.children().iter().any(|g| g.tag() == grandchild))
                })
                .collect(),
        )
    }

    /// Truncates to the first record, if there is one.
    pub fn first(&self) -> Self {
        self.with(self.records.first().copied().into_iter().collect())
    }

    /// Removes records whose value was already seen, keeping the first occurrence of each.
    pub fn uniq(&self) -> Self {
        self.uniq_by(Record::value)
    }

    /// Removes records whose key was already seen, keeping the first occurrence of each.
    pub fn uniq_by<K, F>(&self, key: F) -> Self
    where
        K: Hash + Eq,
        F: Fn(&'a Record) -> K,
    {
        let mut seen = HashSet::with_capacity(self.records.len());
        self.with(
            self.records
                .iter()
                .copied()
                .filter(|&r| seen.insert(key(r)))
                .collect(),
        )
    }

    // Navigation

    /// Replaces each record with its direct children tagged `name`.
    pub fn sub(&self, name: &str) -> Self {
        self.with(self.children().filter(|c| c.tag() == name).collect())
    }

    /// Replaces each record with its direct children whose tag satisfies `predicate`.
    pub fn sub_cond<F>(&self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        self.with(self.children().filter(|c| predicate(c.tag())).collect())
    }

    /// Replaces each record with all of its direct children.
    pub fn all(&self) -> Self {
        self.with(self.children().collect())
    }

    /// For each direct child tagged `name`, follows the pointer in its value to the record that declared it.
    ///
    /// ```
    /// use gedq::GedDoc;
    ///
    /// let doc = GedDoc::parse("0 @I1@ INDI\n1 FAMC @F1@\n0 @F1@ FAM\n1 HUSB @I2@\n").unwrap();
    /// let husbands = doc.all().tag("INDI").deref("FAMC").unwrap().get_attr(&["HUSB"]);
    /// assert_eq!(husbands, vec!["@I2@"]);
    /// ```
    ///
    /// Any pointer that isn't in the registry fails the whole operation.
    pub fn deref(&self, name: &str) -> Result<Self, LookupError> {
        let targets = self
            .children()
            .filter(|c| c.tag() == name)
            .map(|c| self.resolve(c.value()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with(targets))
    }

    /// Follows each record's own value as a pointer. This is useful for records whose value is a reference, such as
    /// a `SOUR @S1@` citation.
    pub fn deref_value(&self) -> Result<Self, LookupError> {
        let targets = self
            .records
            .iter()
            .map(|r| self.resolve(r.value()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with(targets))
    }

    // Projections

    /// The values of every direct child whose tag is one of `names`; per record, then across records.
    pub fn get_attr(&self, names: &[&str]) -> Vec<&'a str> {
        self.children()
            .filter(|c| contains(names, c.tag()))
            .map(Record::value)
            .collect()
    }

    /// Each record's own value.
    pub fn value(&self) -> Vec<&'a str> {
        self.records.iter().map(|r| r.value()).collect()
    }

    /// Each record's pointer id, or `""` for records that didn't declare one.
    pub fn pointer(&self) -> Vec<&'a str> {
        self.records.iter().map(|r| r.pointer().unwrap_or("")).collect()
    }

    /// `(tag, value)` for every direct child of every record.
    ///
    /// This is handy for reassembling text that's been split across continuation lines:
    ///
    /// ```
    /// use gedq::GedDoc;
    ///
    /// let doc = GedDoc::parse("0 @N1@ NOTE First line\n1 CONT second line\n1 CONC , continued\n").unwrap();
    /// let pieces = doc.all().tag("NOTE").collect_child_values();
    /// assert_eq!(pieces, vec![("CONT", "second line"), ("CONC", ", continued")]);
    /// ```
    pub fn collect_child_values(&self) -> Vec<(&'a str, &'a str)> {
        self.children().map(|c| (c.tag(), c.value())).collect()
    }

    /// The first record, if there is one.
    pub fn first_record(&self) -> Option<&'a Record> {
        self.records.first().copied()
    }

    // Combinators

    /// A single-record `Selector` for each record, in order.
    ///
    /// Each call returns a fresh iterator; the iterator itself can also be cloned to restart from its current
    /// position.
    pub fn foreach(&self) -> impl ExactSizeIterator<Item = Selector<'a>> + Clone + '_ {
        let doc = self.doc;
        self.records.iter().map(move |&record| Selector::new(doc, vec![record]))
    }

    /// Applies each projection to this whole selection.
    ///
    /// ```
    /// use gedq::GedDoc;
    ///
    /// let doc = GedDoc::parse("0 INDI\n1 BIRT\n2 DATE 1 JAN 1900\n2 PLAC Springfield\n").unwrap();
    /// let birth = doc.all().sub("BIRT").tuple(&[&|g| g.get_attr(&["DATE"]), &|g| g.get_attr(&["PLAC"])]);
    /// assert_eq!(birth, vec![vec!["1 JAN 1900"], vec!["Springfield"]]);
    /// ```
    pub fn tuple<T>(&self, projections: &[&dyn Fn(&Selector<'a>) -> T]) -> Vec<T> {
        projections.iter().map(|project| project(self)).collect()
    }

    /// Like [`Self::tuple`], but separately for each record (as produced by [`Self::foreach`]).
    pub fn foreach_tuple<T>(&self, projections: &[&dyn Fn(&Selector<'a>) -> T]) -> Vec<Vec<T>> {
        self.foreach().map(|one| one.tuple(projections)).collect()
    }
}

fn contains(set: &[&str], needle: &str) -> bool {
    set.iter().any(|candidate| *candidate == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::utils_for_test::*;
    use indoc::indoc;
    use lazy_static::lazy_static;

    const FAMILY_GED: &str = indoc! {r#"
        0 HEAD
        1 CHAR UTF-8
        0 @I1@ INDI
        1 NAME John /Smith/
        1 SEX M
        1 BIRT
        2 DATE 1 JAN 1900
        2 PLAC Springfield, Illinois
        1 FAMS @F1@
        1 FAMC @F2@
        0 @I2@ INDI
        1 NAME Jane /Doe/
        1 NAME Jane /Smith/
        1 SEX F
        1 BIRT
        2 DATE 2 FEB 1902
        1 DEAT
        2 DATE 1980
        2 PLAC Chicago
        1 FAMS @F1@
        0 @I3@ INDI
        1 NAME Jim /Smith/
        1 SEX M
        1 FAMC @F1@
        1 EVEN
        2 TYPE Arrival
        2 DATE 1920
        2 PLAC New York
        1 EVEN
        2 TYPE Departure
        2 DATE 1921
        2 PLAC
        0 @F1@ FAM
        1 HUSB @I1@
        1 WIFE @I2@
        1 CHIL @I3@
        1 MARR
        2 DATE 1925
        0 @F2@ FAM
        1 CHIL @I1@
        0 @S1@ SOUR
        1 TITL Census
        0 @N1@ NOTE A note
        1 CONC  that continues
        1 CONT on a new line
        0 TRLR
    "#};

    lazy_static! {
        static ref FAMILY: GedDoc = GedDoc::parse(FAMILY_GED).expect("test fixture should parse");
    }

    fn tags(selector: &Selector) -> Vec<String> {
        selector.records().iter().map(|r| r.tag().to_string()).collect()
    }

    #[test]
    fn all_is_top_level() {
        assert_eq!(
            tags(&FAMILY.all()),
            vec!["HEAD", "INDI", "INDI", "INDI", "FAM", "FAM", "SOUR", "NOTE", "TRLR"]
        );
    }

    #[test]
    fn tag_filters() {
        let indis = FAMILY.all().tag("INDI");
        assert_eq!(indis.pointer(), vec!["I1", "I2", "I3"]);
        assert!(FAMILY.all().tag("NOPE").is_empty());
    }

    #[test]
    fn tag_is_idempotent() {
        let once = FAMILY.all().tag("FAM");
        let twice = once.tag("FAM");
        assert_eq!(once.records(), twice.records());
    }

    #[test]
    fn receiver_is_unchanged() {
        let all = FAMILY.all();
        let before = all.len();
        let _ = all.tag("INDI").sub("NAME").first();
        assert_eq!(all.len(), before);
    }

    #[test]
    fn sub_flattens_in_order() {
        let names = FAMILY.all().tag("INDI").sub("NAME").value();
        assert_eq!(names, vec!["John /Smith/", "Jane /Doe/", "Jane /Smith/", "Jim /Smith/"]);
    }

    #[test]
    fn sub_of_empty_is_empty() {
        let empty = FAMILY.all().tag("NOPE");
        assert!(empty.sub("NAME").is_empty());
        assert!(empty.all().is_empty());
    }

    #[test]
    fn sub_cond() {
        let life_events = FAMILY.all().tag("INDI").sub_cond(|tag| tag == "BIRT" || tag == "DEAT");
        assert_eq!(tags(&life_events), vec!["BIRT", "BIRT", "DEAT"]);
    }

    #[test]
    fn all_children() {
        let fam_children = FAMILY.all().tag("FAM").all();
        assert_eq!(tags(&fam_children), vec!["HUSB", "WIFE", "CHIL", "MARR", "CHIL"]);
    }

    #[test]
    fn attr_equal_keeps_parent_once() {
        let janes = FAMILY.all().tag("INDI").attr_equal("NAME", &["Jane /Doe/", "Jane /Smith/"]);
        assert_eq!(janes.pointer(), vec!["I2"]);
    }

    #[test]
    fn attr_equal_nothing() {
        assert!(FAMILY.all().tag("INDI").attr_equal("NAME", &["nonexistent"]).is_empty());
        assert!(FAMILY.all().tag("INDI").attr_equal("NAME", &[]).is_empty());
    }

    #[test]
    fn attr_exclude() {
        let not_male = FAMILY.all().tag("INDI").attr_exclude("SEX", &["M"]);
        assert_eq!(not_male.pointer(), vec!["I2"]);

        // requires the attribute to exist at all
        let no_such_attr = FAMILY.all().tag("INDI").attr_exclude("NICK", &["x"]);
        assert!(no_such_attr.is_empty());
    }

    #[test]
    fn attr_exclude_empty_value() {
        let events = FAMILY
            .all()
            .tag("INDI")
            .sub("EVEN")
            .attr_exclude("PLAC", &[""])
            .attr_exclude("DATE", &[""]);
        assert_eq!(
            events.foreach_tuple(&[&|g| g.get_attr(&["TYPE"]), &|g| g.get_attr(&["PLAC"])]),
            vec![vec![vec!["Arrival"], vec!["New York"]]]
        );
    }

    #[test]
    fn attr_cond() {
        let smiths = FAMILY
            .all()
            .tag("INDI")
            .attr_cond("NAME", |name| name.ends_with("/Smith/"));
        assert_eq!(smiths.pointer(), vec!["I1", "I2", "I3"]);
    }

    #[test]
    fn get_attr_in_file_order() {
        let parents = FAMILY.all().tag("FAM").get_attr(&["WIFE", "HUSB"]);
        assert_eq!(parents, vec!["@I1@", "@I2@"]);

        let sexes = FAMILY.all().tag("INDI").get_attr(&["SEX"]);
        assert_eq!(sexes, vec!["M", "F", "M"]);
    }

    #[test]
    fn deref_follows_child_pointers() {
        let families = FAMILY.all().tag("INDI").deref("FAMS").unwrap();
        assert_eq!(families.pointer(), vec!["F1", "F1"]);

        let spouses = families.first().deref("WIFE").unwrap();
        assert_eq!(spouses.get_attr(&["NAME"]), vec!["Jane /Doe/", "Jane /Smith/"]);
    }

    #[test]
    fn deref_chain_to_siblings() {
        // John's father's family's children
        let children = FAMILY
            .all()
            .tag("INDI")
            .attr_equal("NAME", &["Jim /Smith/"])
            .deref("FAMC")
            .unwrap()
            .deref("HUSB")
            .unwrap()
            .deref("FAMS")
            .unwrap()
            .deref("CHIL")
            .unwrap();
        assert_eq!(children.get_attr(&["NAME"]), vec!["Jim /Smith/"]);
    }

    #[test]
    fn deref_miss_is_an_error() {
        let doc = GedDoc::parse("0 @I1@ INDI\n1 FAMC @F9@\n").unwrap();
        let err = doc.all().tag("INDI").deref("FAMC").unwrap_err();
        assert_eq!(err.pointer(), "@F9@");
        assert_eq!(err.to_string(), r#"no record declares pointer "@F9@""#);
    }

    #[test]
    fn deref_with_no_matching_children() {
        let nothing = FAMILY.all().tag("SOUR").deref("FAMC").unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn deref_value() {
        let doc = GedDoc::parse(indoc! {r#"
            0 @I1@ INDI
            1 NAME John
            2 SOUR @S1@
            3 DATA
            4 TEXT transcribed
            0 @S1@ SOUR
            1 TITL Census
        "#})
        .unwrap();
        let cites = doc.all().tag("INDI").all().sub("SOUR");
        assert_eq!(cites.deref_value().unwrap().get_attr(&["TITL"]), vec!["Census"]);
        assert_eq!(cites.sub("DATA").get_attr(&["TEXT"]), vec!["transcribed"]);
    }

    #[test]
    fn deref_value_without_markers() {
        let doc = GedDoc::parse("0 @I1@ INDI\n1 FAMC F1\n1 ALIA I1\n0 @F1@ FAM\n1 HUSB @I1@\n").unwrap();
        let indi = doc.all().tag("INDI");
        assert_eq!(indi.deref("FAMC").unwrap().pointer(), vec!["F1"]);
        assert_eq!(indi.sub("ALIA").deref_value().unwrap().pointer(), vec!["I1"]);

        // the markers are stripped, not added: "@F1" is neither form of the id
        let doc = GedDoc::parse("0 @I1@ INDI\n1 FAMC @F1\n0 @F1@ FAM\n").unwrap();
        let err = doc.all().tag("INDI").deref("FAMC").unwrap_err();
        assert_eq!(err.pointer(), "@F1");
    }

    #[test]
    fn deref_value_miss() {
        let err = FAMILY.all().tag("NOTE").deref_value().unwrap_err();
        assert_eq!(err.pointer(), "A note");
    }

    #[test]
    fn first() {
        assert_eq!(FAMILY.all().tag("INDI").first().pointer(), vec!["I1"]);
        assert!(FAMILY.all().tag("NOPE").first().is_empty());
        assert_eq!(FAMILY.all().tag("FAM").first_record().and_then(Record::pointer), Some("F1"));
        assert_eq!(FAMILY.all().tag("NOPE").first_record(), None);
    }

    #[test]
    fn require_sub() {
        let with_children = FAMILY.all().require_sub();
        assert_eq!(tags(&with_children), vec!["HEAD", "INDI", "INDI", "INDI", "FAM", "FAM", "SOUR", "NOTE"]);
    }

    #[test]
    fn require_sub_attr() {
        let married = FAMILY.all().tag("FAM").require_sub_attr("MARR", "DATE");
        assert_eq!(married.pointer(), vec!["F1"]);

        let died_somewhere = FAMILY.all().tag("INDI").require_sub_attr("DEAT", "PLAC");
        assert_eq!(died_somewhere.pointer(), vec!["I2"]);
    }

    #[test]
    fn require_sub_attr_is_antitone() {
        let with = GedDoc::parse("0 A\n1 B\n2 C\n0 A\n1 B\n2 C\n").unwrap();
        let without = GedDoc::parse("0 A\n1 B\n2 C\n0 A\n1 B\n").unwrap();
        let with_len = with.all().require_sub_attr("B", "C").len();
        let without_len = without.all().require_sub_attr("B", "C").len();
        assert_eq!(with_len, 2);
        assert_eq!(without_len, 1);
    }

    #[test]
    fn value_and_pointer() {
        let notes = FAMILY.all().tag("NOTE");
        assert_eq!(notes.value(), vec!["A note"]);
        assert_eq!(notes.pointer(), vec!["N1"]);
        assert_eq!(FAMILY.all().tag("HEAD").pointer(), vec![""]);
    }

    #[test]
    fn collect_child_values() {
        let note = FAMILY.all().tag("NOTE");
        assert_eq!(
            note.collect_child_values(),
            vec![("CONC", "that continues"), ("CONT", "on a new line")]
        );
    }

    #[test]
    fn foreach_yields_single_record_selectors() {
        let indis = FAMILY.all().tag("INDI");
        let sexes: Vec<_> = indis.foreach().map(|one| get_only(one.get_attr(&["SEX"]))).collect();
        assert_eq!(sexes, vec!["M", "F", "M"]);
        assert_eq!(indis.foreach().len(), 3);
    }

    #[test]
    fn foreach_is_restartable() {
        let indis = FAMILY.all().tag("INDI");
        let mut iter = indis.foreach();
        let first = iter.next().map(|s| s.pointer());
        let replay = iter.clone();
        assert_eq!(first, Some(vec!["I1"]));
        assert_eq!(iter.map(|s| s.pointer()).collect::<Vec<_>>(), vec![vec!["I2"], vec!["I3"]]);
        assert_eq!(replay.count(), 2);
        assert_eq!(indis.foreach().count(), 3);
    }

    #[test]
    fn tuple_over_whole_selection() {
        let births = FAMILY.all().tag("INDI").sub("BIRT");
        let dates_and_places = births.tuple(&[&|g| g.get_attr(&["DATE"]), &|g| g.get_attr(&["PLAC"])]);
        assert_eq!(
            dates_and_places,
            vec![vec!["1 JAN 1900", "2 FEB 1902"], vec!["Springfield, Illinois"]]
        );
    }

    #[test]
    fn foreach_tuple_per_record() {
        let births = FAMILY.all().tag("INDI").sub("BIRT");
        let per_birth = births.foreach_tuple(&[&|g| g.get_attr(&["DATE"]), &|g| g.get_attr(&["PLAC"])]);
        assert_eq!(
            per_birth,
            vec![
                vec![vec!["1 JAN 1900"], vec!["Springfield, Illinois"]],
                vec![vec!["2 FEB 1902"], vec![]],
            ]
        );
    }

    #[test]
    fn uniq_keeps_first_occurrence_in_order() {
        let doc = GedDoc::parse("0 X b\n0 X a\n0 X b\n0 X c\n0 X a\n").unwrap();
        let uniq = doc.all().uniq();
        assert_eq!(uniq.value(), vec!["b", "a", "c"]);
        assert!(std::ptr::eq(uniq.records()[0], &doc.roots()[0]));
    }

    #[test]
    fn uniq_by_key() {
        let families = FAMILY.all().tag("INDI").deref("FAMS").unwrap();
        assert_eq!(families.len(), 2);
        let distinct = families.uniq_by(|r| r.pointer());
        assert_eq!(distinct.pointer(), vec!["F1"]);
    }

    #[test]
    fn readme_example() {
        let doc = GedDoc::parse(indoc! {r#"
            0 @I1@ INDI
            1 NAME John /Smith/
            1 SEX M
            1 FAMC @F1@
            0 @F1@ FAM
            1 HUSB @I2@
            1 WIFE @I1@
        "#})
        .unwrap();
        assert_eq!(doc.all().tag("INDI").get_attr(&["SEX"]), vec!["M"]);
        let wives = doc.all().tag("INDI").deref("FAMC").unwrap().tag("FAM").get_attr(&["WIFE"]);
        assert_eq!(wives, vec!["@I1@"]);
        assert!(doc.all().tag("INDI").attr_equal("NAME", &["nonexistent"]).is_empty());

        // the wife's pointer only resolves once it's dereferenced
        let wife = doc.all().tag("FAM").deref("WIFE").unwrap();
        assert_eq!(wife.get_attr(&["NAME"]), vec!["John /Smith/"]);

        // ...and the husband isn't in the file at all
        assert!(doc.all().tag("FAM").deref("HUSB").is_err());
    }

    #[test]
    fn concurrent_readers() {
        let doc: &GedDoc = &FAMILY;
        std::thread::scope(|scope| {
            let handles: Vec<_> = ["I1", "I2", "I3"]
                .into_iter()
                .map(|id| {
                    scope.spawn(move || {
                        doc.all()
                            .tag("INDI")
                            .attr_cond("SEX", |_| true)
                            .foreach()
                            .filter(|one| one.pointer() == vec![id])
                            .count()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 1);
            }
        });
    }
}
