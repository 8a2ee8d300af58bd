//! Message types for `proto/test.proto`, laid out the way protoflect codegen
//! emits them: each message with its builder, descriptor and erased entry
//! points.

use core::any::{Any, TypeId};

use protoflect_core::{
    Call, CallError, DecodeError, DescriptorKind, EntryPoint, Message, MessageBuilder,
    MessageDecoder, MessageDescriptor, Reflect, wire,
};

/// `protoflect.test.FavoriteColor`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteColor {
    /// The color name.
    pub color: String,
    /// Ranking priority; lower ranks higher.
    pub priority: i32,
}

const COLOR: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.FavoriteColor")
        .type_identifier("FavoriteColor")
        .id(TypeId::of::<FavoriteColor>)
        .entry_points(&[
            EntryPoint {
                name: "new_builder",
                public: true,
                returns: FavoriteColorBuilder::descriptor,
                call: Call::Nullary(color_new_builder),
            },
            EntryPoint {
                name: "decoder",
                public: true,
                returns: FavoriteColor::descriptor,
                call: Call::Nullary(color_decoder),
            },
        ])
        .build()
};

const COLOR_BUILDER: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.FavoriteColor.Builder")
        .type_identifier("FavoriteColorBuilder")
        .id(TypeId::of::<FavoriteColorBuilder>)
        .kind(DescriptorKind::Builder {
            as_builder: color_as_builder,
        })
        .entry_points(&[EntryPoint {
            name: "build",
            public: true,
            returns: FavoriteColor::descriptor,
            call: Call::Unary(color_build),
        }])
        .build()
};

impl FavoriteColor {
    /// Runtime descriptor for this type.
    pub fn descriptor() -> &'static MessageDescriptor {
        COLOR
    }

    /// Creates an empty builder.
    pub fn new_builder() -> FavoriteColorBuilder {
        FavoriteColorBuilder::default()
    }

    /// Creates the decoder bound to this type.
    pub fn decoder() -> MessageDecoder<FavoriteColor> {
        MessageDecoder::new(COLOR, Self::decode)
    }

    fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut message = Self::default();
        let mut reader = wire::WireReader::new(buf);
        while !reader.is_at_end() {
            let (field, wire_type) = reader.read_key()?;
            match field {
                1 => message.color = reader.read_string(1, wire_type)?,
                2 => message.priority = reader.read_int32(2, wire_type)?,
                _ => reader.skip(wire_type)?,
            }
        }
        Ok(message)
    }
}

impl Message for FavoriteColor {
    fn descriptor(&self) -> &'static MessageDescriptor {
        COLOR
    }

    fn encoded_len(&self) -> usize {
        wire::string_field_len(1, &self.color) + wire::int32_field_len(2, self.priority)
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        wire::encode_string_field(1, &self.color, buf);
        wire::encode_int32_field(2, self.priority, buf);
    }
}

impl Reflect for FavoriteColor {
    const DESCRIPTOR: &'static MessageDescriptor = COLOR;
}

/// Mutable staging for [`FavoriteColor`].
#[derive(Debug, Clone, Default)]
pub struct FavoriteColorBuilder {
    color: String,
    priority: i32,
}

impl FavoriteColorBuilder {
    /// Runtime descriptor for this builder type.
    pub fn descriptor() -> &'static MessageDescriptor {
        COLOR_BUILDER
    }

    /// Sets the color name.
    pub fn set_color(&mut self, color: impl Into<String>) -> &mut Self {
        self.color = color.into();
        self
    }

    /// Sets the priority.
    pub fn set_priority(&mut self, priority: i32) -> &mut Self {
        self.priority = priority;
        self
    }

    /// Finalizes into a [`FavoriteColor`].
    pub fn build(&self) -> FavoriteColor {
        FavoriteColor {
            color: self.color.clone(),
            priority: self.priority,
        }
    }
}

impl MessageBuilder for FavoriteColorBuilder {
    fn descriptor(&self) -> &'static MessageDescriptor {
        COLOR_BUILDER
    }

    fn merge_json(&mut self, json: &str) -> Result<(), DecodeError> {
        let object = parse_object(json)?;
        for (key, value) in &object {
            match key.as_str() {
                "color" => self.color = string_value("color", value)?,
                "priority" => self.priority = int32_value("priority", value)?,
                other => return Err(unknown_field(other)),
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn color_new_builder() -> Result<Box<dyn Any>, CallError> {
    Ok(Box::new(FavoriteColor::new_builder()))
}

fn color_build(builder: Box<dyn Any>) -> Result<Box<dyn Any>, CallError> {
    let builder = builder
        .downcast::<FavoriteColorBuilder>()
        .map_err(|_| CallError::new("build: expected a FavoriteColorBuilder"))?;
    Ok(Box::new(builder.build()))
}

fn color_decoder() -> Result<Box<dyn Any>, CallError> {
    Ok(Box::new(FavoriteColor::decoder()))
}

fn color_as_builder(value: &mut dyn Any) -> Option<&mut dyn MessageBuilder> {
    value
        .downcast_mut::<FavoriteColorBuilder>()
        .map(|builder| builder as &mut dyn MessageBuilder)
}

/// `protoflect.test.FavoriteCar`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteCar {
    /// Manufacturer name.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Model year.
    pub year: i32,
}

const CAR: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.FavoriteCar")
        .type_identifier("FavoriteCar")
        .id(TypeId::of::<FavoriteCar>)
        .entry_points(&[
            EntryPoint {
                name: "new_builder",
                public: true,
                returns: FavoriteCarBuilder::descriptor,
                call: Call::Nullary(car_new_builder),
            },
            EntryPoint {
                name: "decoder",
                public: true,
                returns: FavoriteCar::descriptor,
                call: Call::Nullary(car_decoder),
            },
        ])
        .build()
};

const CAR_BUILDER: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.FavoriteCar.Builder")
        .type_identifier("FavoriteCarBuilder")
        .id(TypeId::of::<FavoriteCarBuilder>)
        .kind(DescriptorKind::Builder {
            as_builder: car_as_builder,
        })
        .entry_points(&[EntryPoint {
            name: "build",
            public: true,
            returns: FavoriteCar::descriptor,
            call: Call::Unary(car_build),
        }])
        .build()
};

impl FavoriteCar {
    /// Runtime descriptor for this type.
    pub fn descriptor() -> &'static MessageDescriptor {
        CAR
    }

    /// Creates an empty builder.
    pub fn new_builder() -> FavoriteCarBuilder {
        FavoriteCarBuilder::default()
    }

    /// Creates the decoder bound to this type.
    pub fn decoder() -> MessageDecoder<FavoriteCar> {
        MessageDecoder::new(CAR, Self::decode)
    }

    fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut message = Self::default();
        let mut reader = wire::WireReader::new(buf);
        while !reader.is_at_end() {
            let (field, wire_type) = reader.read_key()?;
            match field {
                1 => message.make = reader.read_string(1, wire_type)?,
                2 => message.model = reader.read_string(2, wire_type)?,
                3 => message.year = reader.read_int32(3, wire_type)?,
                _ => reader.skip(wire_type)?,
            }
        }
        Ok(message)
    }
}

impl Message for FavoriteCar {
    fn descriptor(&self) -> &'static MessageDescriptor {
        CAR
    }

    fn encoded_len(&self) -> usize {
        wire::string_field_len(1, &self.make)
            + wire::string_field_len(2, &self.model)
            + wire::int32_field_len(3, self.year)
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        wire::encode_string_field(1, &self.make, buf);
        wire::encode_string_field(2, &self.model, buf);
        wire::encode_int32_field(3, self.year, buf);
    }
}

impl Reflect for FavoriteCar {
    const DESCRIPTOR: &'static MessageDescriptor = CAR;
}

/// Mutable staging for [`FavoriteCar`].
#[derive(Debug, Clone, Default)]
pub struct FavoriteCarBuilder {
    make: String,
    model: String,
    year: i32,
}

impl FavoriteCarBuilder {
    /// Runtime descriptor for this builder type.
    pub fn descriptor() -> &'static MessageDescriptor {
        CAR_BUILDER
    }

    /// Sets the manufacturer name.
    pub fn set_make(&mut self, make: impl Into<String>) -> &mut Self {
        self.make = make.into();
        self
    }

    /// Sets the model name.
    pub fn set_model(&mut self, model: impl Into<String>) -> &mut Self {
        self.model = model.into();
        self
    }

    /// Sets the model year.
    pub fn set_year(&mut self, year: i32) -> &mut Self {
        self.year = year;
        self
    }

    /// Finalizes into a [`FavoriteCar`].
    pub fn build(&self) -> FavoriteCar {
        FavoriteCar {
            make: self.make.clone(),
            model: self.model.clone(),
            year: self.year,
        }
    }
}

impl MessageBuilder for FavoriteCarBuilder {
    fn descriptor(&self) -> &'static MessageDescriptor {
        CAR_BUILDER
    }

    fn merge_json(&mut self, json: &str) -> Result<(), DecodeError> {
        let object = parse_object(json)?;
        for (key, value) in &object {
            match key.as_str() {
                "make" => self.make = string_value("make", value)?,
                "model" => self.model = string_value("model", value)?,
                "year" => self.year = int32_value("year", value)?,
                other => return Err(unknown_field(other)),
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn car_new_builder() -> Result<Box<dyn Any>, CallError> {
    Ok(Box::new(FavoriteCar::new_builder()))
}

fn car_build(builder: Box<dyn Any>) -> Result<Box<dyn Any>, CallError> {
    let builder = builder
        .downcast::<FavoriteCarBuilder>()
        .map_err(|_| CallError::new("build: expected a FavoriteCarBuilder"))?;
    Ok(Box::new(builder.build()))
}

fn car_decoder() -> Result<Box<dyn Any>, CallError> {
    Ok(Box::new(FavoriteCar::decoder()))
}

fn car_as_builder(value: &mut dyn Any) -> Option<&mut dyn MessageBuilder> {
    value
        .downcast_mut::<FavoriteCarBuilder>()
        .map(|builder| builder as &mut dyn MessageBuilder)
}

fn parse_object(json: &str) -> Result<serde_json::Map<String, serde_json::Value>, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| DecodeError::Json {
        reason: e.to_string(),
    })?;
    match value {
        serde_json::Value::Object(object) => Ok(object),
        other => Err(DecodeError::Json {
            reason: format!("expected a JSON object, got {other}"),
        }),
    }
}

fn string_value(field: &str, value: &serde_json::Value) -> Result<String, DecodeError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| DecodeError::Json {
            reason: format!("field `{field}` expects a string"),
        })
}

fn int32_value(field: &str, value: &serde_json::Value) -> Result<i32, DecodeError> {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| DecodeError::Json {
            reason: format!("field `{field}` expects a 32-bit integer"),
        })
}

fn unknown_field(name: &str) -> DecodeError {
    DecodeError::Json {
        reason: format!("unknown field `{name}`"),
    }
}
