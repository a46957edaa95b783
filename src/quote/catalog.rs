use serde::Serialize;

/// A predefined offering that can be selected and priced on a quote
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub category: &'static str,
}

pub static SERVICES: [ServiceDefinition; 4] = [
    ServiceDefinition {
        id: "cameras",
        label: "Câmeras (Instalações/Manutenção)",
        category: "Segurança Eletrônica",
    },
    ServiceDefinition {
        id: "cerca",
        label: "Cerca Elétrica",
        category: "Segurança Eletrônica",
    },
    ServiceDefinition {
        id: "instalacao",
        label: "Instalação Elétrica (Nova/Reforma)",
        category: "Serviços Elétricos",
    },
    ServiceDefinition {
        id: "manutencao",
        label: "Manutenção Elétrica Geral",
        category: "Serviços Elétricos",
    },
];

impl ServiceDefinition {
    pub fn checkbox_id(&self) -> String {
        format!("serv_{}", self.id)
    }

    pub fn amount_field_id(&self) -> String {
        format!("val_{}", self.id)
    }

    pub fn detail_field_id(&self) -> String {
        format!("desc_{}", self.id)
    }
}

/// Find a service by its id or by any of its field ids
/// (`serv_<id>`, `val_<id>`, `desc_<id>`)
pub fn lookup(name: &str) -> Option<&'static ServiceDefinition> {
    let id = ["serv_", "val_", "desc_"]
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name);
    SERVICES.iter().find(|def| def.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_categories_in_catalog_order() {
        let mut categories: Vec<&str> = Vec::new();
        for def in SERVICES.iter() {
            if !categories.contains(&def.category) {
                categories.push(def.category);
            }
        }
        assert_eq!(categories, ["Segurança Eletrônica", "Serviços Elétricos"]);
    }

    #[test]
    fn lookup_by_field_ids() {
        assert_eq!(lookup("cerca").unwrap().label, "Cerca Elétrica");
        assert_eq!(lookup("serv_cameras").unwrap().id, "cameras");
        assert_eq!(lookup("val_instalacao").unwrap().id, "instalacao");
        assert_eq!(lookup("desc_manutencao").unwrap().id, "manutencao");
        assert!(lookup("alarme").is_none());
        assert!(lookup("serv_").is_none());
    }

    #[test]
    fn field_id_convention() {
        let cameras = lookup("cameras").unwrap();
        assert_eq!(cameras.checkbox_id(), "serv_cameras");
        assert_eq!(cameras.amount_field_id(), "val_cameras");
        assert_eq!(cameras.detail_field_id(), "desc_cameras");
    }
}
