use std::fmt;

/// Feature types with special handling in the correction pipeline.
pub const TYPE_CDS: &str = "CDS";
pub const TYPE_MRNA: &str = "mRNA";
pub const TYPE_NCRNA: &str = "ncRNA";
pub const TYPE_GAP: &str = "gap";

/// Placeholder type emitted by the EMBL-to-GFF converter for features it
/// cannot express directly. Resolved or discarded before output.
pub const TYPE_SYNTHETIC_REGION: &str = "biological_region";

/// Converter pseudo-feature describing the databank entry itself.
pub const TYPE_DATABANK_ENTRY: &str = "databank_entry";

/// One line of converter output: either a parsed 9-field feature record or
/// an opaque pass-through line (headers, comments, anything else).
#[derive(Debug, Clone, PartialEq)]
pub enum GffLine {
    Feature(FeatureRecord),
    Opaque(String),
}

impl GffLine {
    /// Classify a physical line. A line splitting into exactly 9 tab-delimited
    /// fields whose coordinate columns parse as integers becomes a feature
    /// record; everything else is opaque and passes through the pipeline
    /// unmodified.
    pub fn parse(line: &str) -> GffLine {
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]);
        let fields: Vec<&str> = trimmed.split('\t').collect();
        if fields.len() != 9 {
            return GffLine::Opaque(trimmed.to_string());
        }
        match FeatureRecord::from_fields(&fields) {
            Some(record) => GffLine::Feature(record),
            None => GffLine::Opaque(trimmed.to_string()),
        }
    }

    /// Serialize back to a physical line, including the trailing newline.
    pub fn to_gff_line(&self) -> String {
        match self {
            GffLine::Feature(record) => record.to_gff_line(),
            GffLine::Opaque(text) => format!("{}\n", text),
        }
    }

    pub fn as_feature(&self) -> Option<&FeatureRecord> {
        match self {
            GffLine::Feature(record) => Some(record),
            GffLine::Opaque(_) => None,
        }
    }

    pub fn as_feature_mut(&mut self) -> Option<&mut FeatureRecord> {
        match self {
            GffLine::Feature(record) => Some(record),
            GffLine::Opaque(_) => None,
        }
    }
}

/// One annotated genomic interval: the 9 tab-delimited GFF3 columns.
///
/// Coordinates are 1-based inclusive and kept signed so frame arithmetic
/// stays total even when an upstream record carries inconsistent bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub contig: String,
    pub source: String,
    pub feature_type: String,
    pub start: i64,
    pub end: i64,
    pub score: String,
    pub strand: Strand,
    pub phase: Phase,
    pub attributes: Attributes,
}

impl FeatureRecord {
    fn from_fields(fields: &[&str]) -> Option<FeatureRecord> {
        let start: i64 = fields[3].parse().ok()?;
        let end: i64 = fields[4].parse().ok()?;
        Some(FeatureRecord {
            contig: fields[0].to_string(),
            source: fields[1].to_string(),
            feature_type: fields[2].to_string(),
            start,
            end,
            score: fields[5].to_string(),
            strand: Strand::parse(fields[6]),
            phase: Phase::parse(fields[7]),
            attributes: Attributes::parse(fields[8]),
        })
    }

    pub fn to_gff_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            self.contig,
            self.source,
            self.feature_type,
            self.start,
            self.end,
            self.score,
            self.strand,
            self.phase,
            self.attributes
        )
    }

    pub fn is_type(&self, feature_type: &str) -> bool {
        self.feature_type == feature_type
    }
}

/// Strand of a feature. Anything other than `+`/`-` parses as unknown and
/// serializes as `.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
    Unknown,
}

impl Strand {
    pub fn parse(field: &str) -> Strand {
        match field {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            _ => Strand::Unknown,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unknown => ".",
        };
        write!(f, "{}", symbol)
    }
}

/// Reading-frame phase column: `0`/`1`/`2` for coding records, `.` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Frame(u8),
    Unknown,
}

impl Phase {
    pub fn parse(field: &str) -> Phase {
        match field {
            "0" => Phase::Frame(0),
            "1" => Phase::Frame(1),
            "2" => Phase::Frame(2),
            _ => Phase::Unknown,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Frame(value) => write!(f, "{}", value),
            Phase::Unknown => write!(f, "."),
        }
    }
}

/// A single `key=value` pair from the attribute column. A segment without
/// `=` round-trips as a bare key with an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// Provenance prefix recording a record's identifier before the format
/// round trip, stored as `note=ID:<x>`.
const NOTE_ID_PREFIX: &str = "ID:";
/// Provenance prefix recording a record's parent before the format round
/// trip, stored as `note=Parent:<x>`.
const NOTE_PARENT_PREFIX: &str = "Parent:";

/// The ordered attribute list of a feature record.
///
/// Duplicate keys are legal: upstream merges can duplicate a key, and the
/// `note` key routinely appears once for the original-ID provenance and once
/// for the original-parent provenance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    pairs: Vec<Attribute>,
}

impl Attributes {
    pub fn parse(field: &str) -> Attributes {
        let trimmed = field.trim_end_matches(&['\n', '\r'][..]);
        let pairs = trimmed
            .split(';')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => Attribute {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                None => Attribute {
                    key: segment.to_string(),
                    value: String::new(),
                },
            })
            .collect();
        Attributes { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.pairs.iter()
    }

    /// Value of the first attribute with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.get("ID")
    }

    pub fn parent(&self) -> Option<&str> {
        self.get("Parent")
    }

    /// Original identifier recorded in a `note=ID:<x>` provenance note.
    pub fn original_id(&self) -> Option<&str> {
        self.note_payload(NOTE_ID_PREFIX)
    }

    /// Original parent identifier recorded in a `note=Parent:<x>` note.
    pub fn original_parent(&self) -> Option<&str> {
        self.note_payload(NOTE_PARENT_PREFIX)
    }

    fn note_payload(&self, prefix: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.key == "note" && pair.value.starts_with(prefix))
            .map(|pair| &pair.value[prefix.len()..])
    }

    /// Replace the value of the first attribute with the given key, keeping
    /// its position. Returns false when the key is absent.
    pub fn set_value(&mut self, key: &str, value: &str) -> bool {
        match self.pairs.iter_mut().find(|pair| pair.key == key) {
            Some(pair) => {
                pair.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn insert(&mut self, index: usize, key: &str, value: &str) {
        let index = index.min(self.pairs.len());
        self.pairs.insert(
            index,
            Attribute {
                key: key.to_string(),
                value: value.to_string(),
            },
        );
    }

    pub fn push(&mut self, key: &str, value: &str) {
        self.pairs.push(Attribute {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    /// Drop every attribute that fails the predicate.
    pub fn retain<F: FnMut(&Attribute) -> bool>(&mut self, keep: F) {
        self.pairs.retain(keep);
    }

    /// Rename every attribute with the given key, keeping values and order.
    pub fn rename_key(&mut self, from: &str, to: &str) {
        for pair in &mut self.pairs {
            if pair.key == from {
                pair.key = to.to_string();
            }
        }
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|pair| pair.key == key)
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for pair in &self.pairs {
            if !first {
                write!(f, ";")?;
            }
            first = false;
            if pair.value.is_empty() {
                write!(f, "{}", pair.key)?;
            } else {
                write!(f, "{}={}", pair.key, pair.value)?;
            }
        }
        Ok(())
    }
}
