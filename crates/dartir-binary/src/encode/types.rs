//! Type writer

use super::NodeWriter;
use crate::error::EncodeError;
use crate::format::TypeTag;
use crate::strings::StringInterner;
use crate::writer::ByteSink;
use dartir_ir::DartType;

impl<W: ByteSink, S: StringInterner> NodeWriter<'_, W, S> {
    /// Write a type.
    ///
    /// Generic, function and type-parameter types have no wire form of their
    /// own and are written as `Simple(display_name, nullable)`.
    pub fn write_type(&mut self, ty: &DartType) -> Result<(), EncodeError> {
        match ty {
            DartType::Simple { name, nullable } => {
                self.out.emit_u8(TypeTag::Simple.to_u8());
                self.text(name)?;
                self.flag(*nullable);
            }
            DartType::Dynamic => self.out.emit_u8(TypeTag::Dynamic.to_u8()),
            DartType::Void => self.out.emit_u8(TypeTag::Void.to_u8()),
            DartType::Never => self.out.emit_u8(TypeTag::Never.to_u8()),
            DartType::Generic { .. } | DartType::Function { .. } | DartType::TypeParameter { .. } => {
                self.out.emit_u8(TypeTag::Simple.to_u8());
                self.text(&ty.display_name())?;
                self.flag(ty.is_nullable());
            }
        }
        Ok(())
    }

    pub(super) fn write_types(
        &mut self,
        types: &[DartType],
        context: &'static str,
    ) -> Result<(), EncodeError> {
        self.list(types, context, Self::write_type)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EncoderLimits;
    use crate::encode::NodeWriter;
    use crate::strings::StringCollector;
    use crate::writer::BinaryWriter;
    use dartir_ir::DartType;

    fn encode(ty: &DartType) -> (Vec<u8>, Vec<String>) {
        let limits = EncoderLimits::default();
        let mut collector = StringCollector::new();
        let mut out = BinaryWriter::new();
        NodeWriter::new(&mut out, &mut collector, &limits)
            .write_type(ty)
            .unwrap();
        (out.into_bytes(), collector.freeze().strings().to_vec())
    }

    #[test]
    fn test_simple_nullable() {
        let (bytes, strings) = encode(&DartType::nullable("String"));
        assert_eq!(bytes, vec![0x01, 1, 0, 0, 0, 0, 1]);
        assert_eq!(strings, vec!["String".to_string()]);
    }

    #[test]
    fn test_keywords_have_no_payload() {
        assert_eq!(encode(&DartType::Dynamic).0, vec![0x02]);
        assert_eq!(encode(&DartType::Void).0, vec![0x03]);
        assert_eq!(encode(&DartType::Never).0, vec![0x04]);
    }

    #[test]
    fn test_generic_falls_back_to_display_name() {
        let ty = DartType::Generic {
            name: "List".to_string(),
            type_arguments: vec![DartType::nullable("int")],
            nullable: true,
        };
        let (bytes, strings) = encode(&ty);
        assert_eq!(bytes, encode(&DartType::nullable("List<int?>")).0);
        assert_eq!(strings, vec!["List<int?>".to_string()]);
    }
}
