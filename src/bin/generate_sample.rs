use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use sheet_sieve::data::model::{CellValue, Row};
use sheet_sieve::export::{export_rows, ExportFormat};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// `Some(value)` with probability `1 - p_missing`.
    fn sparse<T>(&mut self, p_missing: f64, value: T) -> Option<T> {
        (self.next_f64() >= p_missing).then_some(value)
    }
}

struct Contact {
    id: i64,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    city: Option<String>,
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let first_names = ["Ada", "Bob", "Carol", "Dan", "Eve", "Finn", "Grace", "Hugo"];
    let cities = ["Lisbon", "Oslo", "Quito", "Perth"];

    let contacts: Vec<Contact> = (0..40)
        .map(|i| {
            let first = first_names[i % first_names.len()];
            let name = format!("{first} {}", i / first_names.len() + 1);
            let email = format!("{}{}@example.com", first.to_lowercase(), i);
            let phone = format!("555-{:04}", 100 + i);
            let city = cities[(rng.next_u64() % cities.len() as u64) as usize];
            Contact {
                id: i as i64 + 1,
                name: rng.sparse(0.1, name),
                email: rng.sparse(0.35, email),
                phone: rng.sparse(0.35, phone),
                city: rng.sparse(0.2, city.to_string()),
            }
        })
        .collect();

    write_parquet(&contacts, Path::new("sample_contacts.parquet"))?;

    let rows: Vec<Row> = contacts
        .iter()
        .map(|c| {
            [
                ("id", CellValue::Integer(c.id)),
                ("name", text(&c.name)),
                ("email", text(&c.email)),
                ("phone", text(&c.phone)),
                ("city", text(&c.city)),
            ]
            .into_iter()
            .collect()
        })
        .collect();
    let xlsx = export_rows(
        &rows,
        ExportFormat::Xlsx,
        Path::new("."),
        "sample_contacts.xlsx",
        "Contacts",
    )?;

    println!(
        "Wrote {} contacts to sample_contacts.parquet and {}",
        contacts.len(),
        xlsx.display()
    );
    Ok(())
}

fn text(value: &Option<String>) -> CellValue {
    value.clone().map_or(CellValue::Null, CellValue::String)
}

fn string_column<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ArrayRef {
    Arc::new(values.collect::<StringArray>())
}

fn write_parquet(contacts: &[Contact], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("email", DataType::Utf8, true),
        Field::new("phone", DataType::Utf8, true),
        Field::new("city", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(contacts.iter().map(|c| c.id))) as ArrayRef,
            string_column(contacts.iter().map(|c| c.name.as_deref())),
            string_column(contacts.iter().map(|c| c.email.as_deref())),
            string_column(contacts.iter().map(|c| c.phone.as_deref())),
            string_column(contacts.iter().map(|c| c.city.as_deref())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
