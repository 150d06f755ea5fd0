//! Plan-driven encoding and decoding of dynamic [`Value`]s.
//!
//! A message is a [`Value::Struct`] with one value per field in declaration
//! order. Arrays of either kind are [`Value::Array`]. `byte` maps to
//! [`Value::I8`] and `char` to [`Value::U8`].

use msgc_core::{CodecError, PrimitiveType, TypeRef, Value};
use msgc_plan::{Element, FieldPlan, PlanTable, SerializationPlan, Strategy};

use crate::wire::{WireReader, WireWriter};

/// Encode `value` as an instance of the plan table's root type.
pub fn encode(plans: &PlanTable, value: &Value) -> Result<Vec<u8>, CodecError> {
    let capacity = plans
        .root_plan()
        .and_then(|p| p.fixed_size_bytes)
        .unwrap_or_default();
    let mut enc = Encoder {
        plans,
        w: WireWriter::with_capacity(capacity),
    };
    enc.encode_struct(plans.root(), value, &plans.root().name)?;
    Ok(enc.w.into_vec())
}

/// Decode one instance of the plan table's root type. The whole buffer must
/// be consumed.
pub fn decode(plans: &PlanTable, bytes: &[u8]) -> Result<Value, CodecError> {
    let path = plans.root().name.as_str();
    let mut dec = Decoder {
        plans,
        r: WireReader::new(bytes),
    };
    let value = dec.decode_struct(plans.root(), path)?;
    dec.r.finish(path)?;
    Ok(value)
}

fn plan_for<'p>(
    plans: &'p PlanTable,
    type_ref: &TypeRef,
) -> Result<&'p SerializationPlan, CodecError> {
    plans
        .get(type_ref)
        .ok_or_else(|| CodecError::MissingPlan(type_ref.clone()))
}

/// Smallest possible encoding of one element, used to bound count prefixes.
fn min_element_size(plans: &PlanTable, element: &Element) -> Result<usize, CodecError> {
    match element {
        Element::Primitive(p) => Ok(p.fixed_width().unwrap_or(4)),
        Element::Nested(r) => min_plan_size(plans, plan_for(plans, r)?),
    }
}

fn min_plan_size(plans: &PlanTable, plan: &SerializationPlan) -> Result<usize, CodecError> {
    if let Some(n) = plan.fixed_size_bytes {
        return Ok(n);
    }
    let mut total = 0usize;
    for fp in &plan.field_plans {
        let size = match fp.strategy {
            Strategy::LengthPrefixedArray => 4,
            Strategy::FixedArray(n) => n.saturating_mul(min_element_size(plans, &fp.element)?),
            _ => min_element_size(plans, &fp.element)?,
        };
        total = total.saturating_add(size);
    }
    Ok(total)
}

// ── encode ───────────────────────────────────────────────────────────────────

struct Encoder<'p> {
    plans: &'p PlanTable,
    w: WireWriter,
}

impl Encoder<'_> {
    fn mismatch(&self, path: &str, detail: String) -> CodecError {
        CodecError::Encoding {
            field: path.to_string(),
            offset: self.w.len(),
            detail,
        }
    }

    fn encode_struct(
        &mut self,
        type_ref: &TypeRef,
        value: &Value,
        path: &str,
    ) -> Result<(), CodecError> {
        let plan = plan_for(self.plans, type_ref)?;
        let Value::Struct(fields) = value else {
            return Err(self.mismatch(
                path,
                format!("expected Struct for {type_ref}, got {}", value.variant_name()),
            ));
        };
        if fields.len() != plan.field_plans.len() {
            return Err(self.mismatch(
                path,
                format!(
                    "{type_ref} has {} fields, value has {}",
                    plan.field_plans.len(),
                    fields.len()
                ),
            ));
        }
        for (fp, v) in plan.field_plans.iter().zip(fields) {
            self.encode_field(fp, v, &format!("{path}.{}", fp.field.name))?;
        }
        Ok(())
    }

    fn encode_field(
        &mut self,
        fp: &FieldPlan,
        value: &Value,
        path: &str,
    ) -> Result<(), CodecError> {
        match fp.strategy {
            Strategy::FixedWidth | Strategy::LengthPrefixedString | Strategy::Nested => {
                self.encode_element(&fp.element, value, path)
            }
            Strategy::FixedArray(n) => {
                let items = self.array(value, path)?;
                if items.len() != n {
                    return Err(self.mismatch(
                        path,
                        format!("fixed array needs {n} elements, value has {}", items.len()),
                    ));
                }
                self.encode_items(&fp.element, items, path)
            }
            Strategy::LengthPrefixedArray => {
                let items = self.array(value, path)?;
                self.w.put_len(path, items.len())?;
                self.encode_items(&fp.element, items, path)
            }
        }
    }

    fn array<'v>(&self, value: &'v Value, path: &str) -> Result<&'v [Value], CodecError> {
        match value {
            Value::Array(items) => Ok(items),
            other => Err(self.mismatch(
                path,
                format!("expected Array, got {}", other.variant_name()),
            )),
        }
    }

    fn encode_items(
        &mut self,
        element: &Element,
        items: &[Value],
        path: &str,
    ) -> Result<(), CodecError> {
        for (i, item) in items.iter().enumerate() {
            self.encode_element(element, item, &format!("{path}[{i}]"))?;
        }
        Ok(())
    }

    fn encode_element(
        &mut self,
        element: &Element,
        value: &Value,
        path: &str,
    ) -> Result<(), CodecError> {
        match element {
            Element::Primitive(p) => self.encode_primitive(*p, value, path),
            Element::Nested(r) => self.encode_struct(r, value, path),
        }
    }

    fn encode_primitive(
        &mut self,
        p: PrimitiveType,
        value: &Value,
        path: &str,
    ) -> Result<(), CodecError> {
        use PrimitiveType as P;

        match (p, value) {
            (P::Bool, Value::Bool(v)) => self.w.put_bool(*v),
            (P::I8 | P::Byte, Value::I8(v)) => self.w.put_i8(*v),
            (P::U8 | P::Char, Value::U8(v)) => self.w.put_u8(*v),
            (P::I16, Value::I16(v)) => self.w.put_i16(*v),
            (P::U16, Value::U16(v)) => self.w.put_u16(*v),
            (P::I32, Value::I32(v)) => self.w.put_i32(*v),
            (P::U32, Value::U32(v)) => self.w.put_u32(*v),
            (P::I64, Value::I64(v)) => self.w.put_i64(*v),
            (P::U64, Value::U64(v)) => self.w.put_u64(*v),
            (P::F32, Value::F32(v)) => self.w.put_f32(*v),
            (P::F64, Value::F64(v)) => self.w.put_f64(*v),
            (P::String, Value::String(s)) => self.w.put_string(path, s)?,
            (P::Time, Value::Time { secs, nsecs }) => self.w.put_time(*secs, *nsecs),
            (P::Duration, Value::Duration { secs, nsecs }) => self.w.put_duration(*secs, *nsecs),
            (p, other) => {
                return Err(self.mismatch(
                    path,
                    format!("{p} field cannot hold a {} value", other.variant_name()),
                ));
            }
        }
        Ok(())
    }
}

// ── decode ───────────────────────────────────────────────────────────────────

struct Decoder<'p, 'b> {
    plans: &'p PlanTable,
    r: WireReader<'b>,
}

impl Decoder<'_, '_> {
    fn decode_struct(&mut self, type_ref: &TypeRef, path: &str) -> Result<Value, CodecError> {
        let plan = plan_for(self.plans, type_ref)?;
        let mut fields = Vec::with_capacity(plan.field_plans.len());
        for fp in &plan.field_plans {
            fields.push(self.decode_field(fp, &format!("{path}.{}", fp.field.name))?);
        }
        Ok(Value::Struct(fields))
    }

    fn decode_field(&mut self, fp: &FieldPlan, path: &str) -> Result<Value, CodecError> {
        let len = match fp.strategy {
            Strategy::FixedWidth | Strategy::LengthPrefixedString | Strategy::Nested => {
                return self.decode_element(&fp.element, path);
            }
            Strategy::FixedArray(n) => n,
            Strategy::LengthPrefixedArray => {
                let min_size = min_element_size(self.plans, &fp.element)?;
                self.r.read_len(path, min_size)?
            }
        };
        let mut items = Vec::with_capacity(len.min(self.r.remaining()));
        for i in 0..len {
            items.push(self.decode_element(&fp.element, &format!("{path}[{i}]"))?);
        }
        Ok(Value::Array(items))
    }

    fn decode_element(&mut self, element: &Element, path: &str) -> Result<Value, CodecError> {
        match element {
            Element::Primitive(p) => self.decode_primitive(*p, path),
            Element::Nested(r) => self.decode_struct(r, path),
        }
    }

    fn decode_primitive(&mut self, p: PrimitiveType, path: &str) -> Result<Value, CodecError> {
        use PrimitiveType as P;

        let r = &mut self.r;
        Ok(match p {
            P::Bool => Value::Bool(r.read_bool(path)?),
            P::I8 | P::Byte => Value::I8(r.read_i8(path)?),
            P::U8 | P::Char => Value::U8(r.read_u8(path)?),
            P::I16 => Value::I16(r.read_i16(path)?),
            P::U16 => Value::U16(r.read_u16(path)?),
            P::I32 => Value::I32(r.read_i32(path)?),
            P::U32 => Value::U32(r.read_u32(path)?),
            P::I64 => Value::I64(r.read_i64(path)?),
            P::U64 => Value::U64(r.read_u64(path)?),
            P::F32 => Value::F32(r.read_f32(path)?),
            P::F64 => Value::F64(r.read_f64(path)?),
            P::String => Value::String(r.read_string(path)?),
            P::Time => {
                let (secs, nsecs) = r.read_time(path)?;
                Value::Time { secs, nsecs }
            }
            P::Duration => {
                let (secs, nsecs) = r.read_duration(path)?;
                Value::Duration { secs, nsecs }
            }
        })
    }
}
