use {
    crate::video::drm::{DrmDevice, DrmError, DrmObject, DrmProperty, DrmPropertyValue},
    bstr::{BString, ByteSlice},
    std::rc::Rc,
};

/// The properties of one kernel object, fetched once and looked up by name.
///
/// Property ids differ between objects and between device opens, so a table is only valid
/// for the object it was collected from.
#[derive(Debug, Default)]
pub struct PropertyTable {
    props: Vec<(BString, DrmPropertyValue)>,
}

impl PropertyTable {
    pub fn collect<T: DrmObject>(dev: &Rc<dyn DrmDevice>, obj: T) -> Result<Self, DrmError> {
        let mut props = vec![];
        for prop in dev.get_properties(obj)? {
            let name = dev.get_property_name(prop.id)?;
            props.push((name, prop));
        }
        Ok(Self { props })
    }

    fn get(&self, name: &str) -> Option<&DrmPropertyValue> {
        self.props
            .iter()
            .find(|(n, _)| n.as_bytes() == name.as_bytes())
            .map(|(_, p)| p)
    }

    /// Returns the id of the property or `None` if the object does not have it.
    pub fn find(&self, name: &str) -> Option<DrmProperty> {
        self.get(name).map(|p| p.id)
    }

    /// Returns the value the property had when the table was collected.
    pub fn value(&self, name: &str) -> Option<u64> {
        self.get(name).map(|p| p.value)
    }
}

